// crates/core/src/table.rs
//! CSV-backed table with header-addressed column access.
//!
//! Thin wrapper over the `csv` crate. The tool surface works in terms of
//! whole materialized tables — row counts here are small enough that
//! streaming buys nothing and order preservation falls out for free.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::TableError;

/// An in-memory tabular dataset: ordered headers plus rows of string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Read a CSV file with a header row.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Write the table to a CSV file with a header row.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
        writer
            .write_record(&self.headers)
            .map_err(|e| csv_error(path, e))?;
        for row in &self.rows {
            writer.write_record(row).map_err(|e| csv_error(path, e))?;
        }
        writer.flush().map_err(|e| TableError::io(path, e))?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column, or an error listing the available columns.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::ColumnNotFound {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// All cell values of a named column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let idx = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).map_or("", String::as_str))
            .collect())
    }

    /// Add or replace a column. A column whose name already exists is
    /// overwritten in place; otherwise the column is appended.
    ///
    /// `values` must have one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.headers.iter().position(|h| h == name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// A new table containing only the rows at `indices`, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Rows as JSON objects keyed by header, in row order.
    pub fn records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (header, cell) in self.headers.iter().zip(row) {
                    obj.insert(header.clone(), Value::String(cell.clone()));
                }
                Value::Object(obj)
            })
            .collect()
    }

    /// The first `n` rows as JSON objects.
    pub fn preview(&self, n: usize) -> Vec<Value> {
        let mut records = self.records();
        records.truncate(n);
        records
    }
}

fn csv_error(path: &Path, err: csv::Error) -> TableError {
    let path: PathBuf = path.to_path_buf();
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => TableError::io(path, io),
        _ => TableError::malformed(path, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_fixture(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_csv_headers_and_rows() {
        let file = write_fixture("id,text\n1,hello\n2,world\n");
        let table = Table::read_csv(file.path()).unwrap();
        assert_eq!(table.headers(), &["id".to_string(), "text".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("text").unwrap(), vec!["hello", "world"]);
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = Table::read_csv("/nonexistent/rows.csv").unwrap_err();
        assert!(matches!(err, TableError::NotFound { .. }));
    }

    #[test]
    fn test_column_not_found_lists_available() {
        let file = write_fixture("id,body\n1,hi\n");
        let table = Table::read_csv(file.path()).unwrap();
        let err = table.column("text").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Column 'text' not found in CSV. Available columns: ["id", "body"]"#
        );
    }

    #[test]
    fn test_set_column_appends_and_overwrites() {
        let file = write_fixture("id,text\n1,a\n2,b\n");
        let mut table = Table::read_csv(file.path()).unwrap();

        table.set_column("tag", vec!["x".into(), "y".into()]);
        assert_eq!(table.headers().len(), 3);
        assert_eq!(table.column("tag").unwrap(), vec!["x", "y"]);

        // Same name again — overwritten in place, no duplicate header.
        table.set_column("tag", vec!["p".into(), "q".into()]);
        assert_eq!(table.headers().len(), 3);
        assert_eq!(table.column("tag").unwrap(), vec!["p", "q"]);
    }

    #[test]
    fn test_select_rows_preserves_order() {
        let file = write_fixture("id\n1\n2\n3\n4\n");
        let table = Table::read_csv(file.path()).unwrap();
        let subset = table.select_rows(&[0, 2, 3]);
        assert_eq!(subset.column("id").unwrap(), vec!["1", "3", "4"]);
    }

    #[test]
    fn test_records_and_preview() {
        let file = write_fixture("id,text\n1,a\n2,b\n3,c\n");
        let table = Table::read_csv(file.path()).unwrap();
        let preview = table.preview(2);
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0]["id"], "1");
        assert_eq!(preview[1]["text"], "b");
        assert_eq!(table.records().len(), 3);
    }

    #[test]
    fn test_write_csv_round_trip() {
        let file = write_fixture("id,text\n1,hello\n");
        let table = Table::read_csv(file.path()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        table.write_csv(&out).unwrap();

        let reread = Table::read_csv(&out).unwrap();
        assert_eq!(reread, table);
    }
}

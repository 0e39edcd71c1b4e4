// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when building or validating a taxonomy
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("Taxonomy tag list is empty")]
    EmptyTagList,

    #[error("Taxonomy has no fields")]
    NoFields,

    #[error("Taxonomy tag must be a non-empty string")]
    EmptyTag,

    #[error("Taxonomy field name must be a non-empty string")]
    EmptyFieldName,

    #[error("Taxonomy field '{field}' has no values")]
    NoValues { field: String },
}

/// Errors that can occur when reading, writing, or indexing a CSV table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied reading file: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {message}")]
    MalformedCsv { path: PathBuf, message: String },

    // Message shape is part of the tool contract; callers match on it.
    #[error("Column '{column}' not found in CSV. Available columns: {available:?}")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },
}

impl TableError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedCsv {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_message_shape() {
        let err = TableError::ColumnNotFound {
            column: "text".to_string(),
            available: vec!["id".to_string(), "body".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"Column 'text' not found in CSV. Available columns: ["id", "body"]"#
        );
    }

    #[test]
    fn test_table_error_io_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = TableError::io("/test/rows.csv", io_err);
        assert!(matches!(err, TableError::NotFound { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TableError::io("/test/rows.csv", io_err);
        assert!(matches!(err, TableError::PermissionDenied { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err = TableError::io("/test/rows.csv", io_err);
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn test_taxonomy_error_display() {
        assert!(TaxonomyError::NoValues {
            field: "sentiment".into()
        }
        .to_string()
        .contains("sentiment"));
    }
}

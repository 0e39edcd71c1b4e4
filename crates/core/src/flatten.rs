// crates/core/src/flatten.rs
//! Response flattening: structured per-row results → flat output columns.
//!
//! Success rows and error rows partition the input: every row lands in
//! exactly one of the flattened table or the error list, in input order.

use serde::Serialize;

use crate::classify::RowClassification;
use crate::error::TableError;
use crate::llm::LlmError;
use crate::table::Table;
use crate::taxonomy::Taxonomy;

/// A row whose classification failed, excluded from the primary output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// Zero-based index of the row in the input table.
    pub row: usize,
    /// The original text that was being classified.
    pub text: String,
    /// Machine-readable error code.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Result of flattening one classified batch.
#[derive(Debug, Clone)]
pub struct FlattenedBatch {
    /// Input columns plus the derived columns, success rows only.
    pub table: Table,
    /// Rows excluded from the primary output, in input order.
    pub errors: Vec<RowError>,
}

/// Flatten per-row structured results into output columns.
///
/// For every taxonomy field the output gains `<field>` and
/// `<field>_confidence` columns, plus `<field>_thinking` /
/// `<field>_reflection` when `include_details` is set. A single-field
/// taxonomy drops the field-name prefix on the derived suffix columns
/// (`confidence`, `thinking`, `reflection`) to keep single-dimension output
/// flat; the value column always keeps the field name.
pub fn flatten_results(
    taxonomy: &Taxonomy,
    table: &Table,
    text_column: &str,
    results: &[Result<RowClassification, LlmError>],
    include_details: bool,
) -> Result<FlattenedBatch, TableError> {
    debug_assert_eq!(results.len(), table.len());
    let texts = table.column(text_column)?;

    let mut success_indices = Vec::new();
    let mut success_rows: Vec<&RowClassification> = Vec::new();
    let mut errors = Vec::new();

    for (i, result) in results.iter().enumerate() {
        let text = texts.get(i).copied().unwrap_or("").to_string();
        match result {
            Err(e) => errors.push(RowError {
                row: i,
                text,
                code: e.code().to_string(),
                details: Some(e.to_string()),
            }),
            Ok(row) => {
                let failed: Vec<_> = row
                    .iter()
                    .filter(|(_, fc)| fc.error.is_some())
                    .collect();
                if let Some((_, first)) = failed.first() {
                    let details = failed
                        .iter()
                        .map(|(field, fc)| {
                            format!(
                                "{field}: {}",
                                fc.error_details.as_deref().unwrap_or("unknown")
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("; ");
                    errors.push(RowError {
                        row: i,
                        text,
                        code: first.error.clone().unwrap_or_default(),
                        details: Some(details),
                    });
                } else {
                    success_indices.push(i);
                    success_rows.push(row);
                }
            }
        }
    }

    let mut out = table.select_rows(&success_indices);
    let single = taxonomy.is_single_field();

    for field in taxonomy.field_names() {
        let suffix = |kind: &str| {
            if single {
                kind.to_string()
            } else {
                format!("{field}_{kind}")
            }
        };
        let pick = |f: fn(&crate::classify::FieldClassification) -> String| -> Vec<String> {
            success_rows
                .iter()
                .map(|row| row.get(field).map(f).unwrap_or_default())
                .collect()
        };

        out.set_column(field, pick(|fc| fc.value.clone()));
        out.set_column(
            &suffix("confidence"),
            pick(|fc| fc.confidence.as_str().to_string()),
        );
        if include_details {
            out.set_column(
                &suffix("thinking"),
                pick(|fc| fc.thinking.clone().unwrap_or_default()),
            );
            out.set_column(
                &suffix("reflection"),
                pick(|fc| fc.reflection.clone().unwrap_or_default()),
            );
        }
    }

    Ok(FlattenedBatch { table: out, errors })
}

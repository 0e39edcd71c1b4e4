// crates/core/src/batch.rs
//! Ordered concurrent dispatch of rows to an LLM provider.
//!
//! Concurrency is bounded `buffered` dispatch over a futures stream: row
//! order in equals row order out, and a per-row failure is captured in place
//! instead of aborting the batch.

use std::sync::Arc;

use futures_util::{stream, StreamExt};

use crate::classify::RowClassification;
use crate::error::TableError;
use crate::llm::prompt::{build_system_prompt, build_user_prompt, enforce_vocabulary};
use crate::llm::{ClassificationRequest, LlmError, LlmProvider};
use crate::table::Table;
use crate::taxonomy::Taxonomy;

/// Classify every row of `table` against `taxonomy`, reading the text from
/// `text_column`.
///
/// Returns one result per input row, in input order. Fails fast only on a
/// missing text column; inference errors stay per-row.
pub async fn classify_table(
    provider: Arc<dyn LlmProvider>,
    taxonomy: &Taxonomy,
    table: &Table,
    text_column: &str,
    include_details: bool,
    max_concurrency: usize,
) -> Result<Vec<Result<RowClassification, LlmError>>, TableError> {
    let texts = table.column(text_column)?;
    let system_prompt = build_system_prompt(taxonomy, include_details);
    let fields: Vec<String> = taxonomy.field_names().map(str::to_string).collect();

    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        rows = texts.len(),
        fields = fields.len(),
        max_concurrency,
        "dispatching classification batch"
    );

    let results: Vec<Result<RowClassification, LlmError>> = stream::iter(texts)
        .map(|text| {
            let provider = Arc::clone(&provider);
            let request = ClassificationRequest {
                system_prompt: system_prompt.clone(),
                user_prompt: build_user_prompt(text),
                fields: fields.clone(),
            };
            async move {
                let mut result = provider.classify(&request).await;
                if let Ok(row) = &mut result {
                    enforce_vocabulary(taxonomy, row);
                }
                result
            }
        })
        .buffered(max_concurrency.max(1))
        .collect()
        .await;

    let errors = results.iter().filter(|r| r.is_err()).count();
    tracing::info!(
        rows = results.len(),
        errors,
        "classification batch complete"
    );
    Ok(results)
}

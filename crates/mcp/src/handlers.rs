// crates/mcp/src/handlers.rs
//! Tool implementations.
//!
//! Every tool converts its failures at this boundary into a
//! `{status: "error", message}` payload, so a remote caller always receives a
//! well-formed response. Per-row inference errors never abort a batch; they
//! ride along in the `errors` list.

use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use serde_json::{json, Value};

use taxotag_core::batch::classify_table;
use taxotag_core::flatten::flatten_results;
use taxotag_core::llm::{create_provider, LlmConfig, LlmError, LlmProvider, ProviderKind};
use taxotag_core::{Table, TaxonomySpec};

/// Builds a provider from config. Swapped out in tests for a scripted one.
pub type ProviderFactory =
    Box<dyn Fn(&LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> + Send + Sync>;

pub struct ToolHandlers {
    provider_factory: ProviderFactory,
}

impl Default for ToolHandlers {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct TagCsvParams {
    csv_path: String,
    taxonomy: TaxonomySpec,
    #[serde(default = "default_field_name")]
    field_name: String,
    #[serde(default = "default_text_column")]
    text_column: String,
    #[serde(default = "default_provider")]
    provider: String,
    model: Option<String>,
    api_key: Option<String>,
    output_path: Option<String>,
    #[serde(default)]
    include_details: bool,
}

fn default_field_name() -> String {
    "tags".to_string()
}

fn default_text_column() -> String {
    "text".to_string()
}

fn default_provider() -> String {
    "claude".to_string()
}

#[derive(Debug, Deserialize)]
struct PreviewCsvParams {
    csv_path: String,
    #[serde(default = "default_preview_rows")]
    rows: usize,
}

fn default_preview_rows() -> usize {
    5
}

impl ToolHandlers {
    pub fn new() -> Self {
        Self {
            provider_factory: Box::new(|config| create_provider(config)),
        }
    }

    /// Handlers with a custom provider factory (used by tests).
    pub fn with_provider_factory(provider_factory: ProviderFactory) -> Self {
        Self { provider_factory }
    }

    /// Dispatch a tool call by name. Returns `None` for an unknown tool.
    pub async fn call(&self, name: &str, arguments: Value) -> Option<Value> {
        let payload = match name {
            "tag_csv" => self.tag_csv(arguments).await,
            "preview_csv" => self.preview_csv(arguments),
            "get_tagging_info" => self.get_tagging_info(),
            _ => return None,
        };
        Some(payload)
    }

    /// Tag every row of a CSV against a taxonomy.
    pub async fn tag_csv(&self, arguments: Value) -> Value {
        match self.tag_csv_inner(arguments).await {
            Ok(payload) => payload,
            Err(e) => error_payload(&e),
        }
    }

    async fn tag_csv_inner(&self, arguments: Value) -> anyhow::Result<Value> {
        let params: TagCsvParams =
            serde_json::from_value(arguments).context("invalid tag_csv arguments")?;

        let table = Table::read_csv(&params.csv_path)?;
        // Validate the text column up front so the caller gets the exact
        // "Column ... not found" message before any provider work.
        table.column_index(&params.text_column)?;

        let taxonomy = params.taxonomy.into_taxonomy(&params.field_name)?;
        let kind = ProviderKind::parse(&params.provider)?;
        let model = params
            .model
            .unwrap_or_else(|| kind.default_model().to_string());
        let config = LlmConfig::new(kind, model).with_api_key(params.api_key);
        let provider = (self.provider_factory)(&config)?;

        tracing::info!(
            csv_path = %params.csv_path,
            rows = table.len(),
            provider = %kind,
            model = %config.model,
            "tag_csv: starting"
        );

        let results = classify_table(
            provider,
            &taxonomy,
            &table,
            &params.text_column,
            params.include_details,
            config.max_concurrency,
        )
        .await?;
        let batch = flatten_results(
            &taxonomy,
            &table,
            &params.text_column,
            &results,
            params.include_details,
        )?;

        let tagged = batch.table.len();
        let failed = batch.errors.len();
        let message = if failed == 0 {
            format!("Successfully tagged {tagged} rows")
        } else {
            format!("Successfully tagged {tagged} rows, {failed} rows failed")
        };
        tracing::info!(tagged, failed, "tag_csv: complete");

        let mut payload = json!({"status": "success", "message": message});
        if let Some(output_path) = params.output_path {
            batch.table.write_csv(&output_path)?;
            payload["output_path"] = json!(output_path);
            payload["preview"] = json!(batch.table.preview(5));
        } else {
            payload["data"] = json!(batch.table.records());
        }
        if failed > 0 {
            payload["errors"] = serde_json::to_value(&batch.errors)?;
        }
        Ok(payload)
    }

    /// Preview the first rows of a CSV file.
    pub fn preview_csv(&self, arguments: Value) -> Value {
        let inner = || -> anyhow::Result<Value> {
            let params: PreviewCsvParams =
                serde_json::from_value(arguments).context("invalid preview_csv arguments")?;
            let table = Table::read_csv(&params.csv_path)?;
            Ok(json!({
                "status": "success",
                "columns": table.headers(),
                "rows": table.len(),
                "preview": table.preview(params.rows),
            }))
        };
        inner().unwrap_or_else(|e| error_payload(&e))
    }

    /// Static server and provider information.
    pub fn get_tagging_info(&self) -> Value {
        let providers: Vec<Value> = ProviderKind::ALL
            .iter()
            .map(|kind| {
                json!({
                    "name": kind.as_str(),
                    "models": kind.known_models(),
                    "default_model": kind.default_model(),
                    "env_var": kind.env_var(),
                })
            })
            .collect();

        json!({
            "name": "taxotag",
            "description": "MCP server for tagging CSV rows against a taxonomy with parallel LLM inference",
            "version": env!("CARGO_PKG_VERSION"),
            "supported_providers": providers,
            "features": [
                "Parallel LLM inference for fast batch processing",
                "Multiple LLM provider support",
                "Schema-constrained structured output",
                "Flat or multi-field taxonomy input",
                "Optional per-field thinking and reflection output",
            ],
        })
    }
}

fn error_payload(error: &anyhow::Error) -> Value {
    tracing::warn!(error = %error, "tool call failed");
    json!({"status": "error", "message": error.to_string()})
}

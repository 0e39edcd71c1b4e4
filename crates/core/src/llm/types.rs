// crates/core/src/llm/types.rs
//! Request and error types for LLM integration.

use thiserror::Error;

/// Request to classify one row of text against a taxonomy.
///
/// The system prompt carries the full taxonomy description; `fields` lists
/// the field names the response object must be keyed by, so adapters can
/// coerce a bare single-field reply into the keyed shape.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub fields: Vec<String>,
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Unsupported provider: {given}. Use {allowed}")]
    UnsupportedProvider { given: String, allowed: String },

    #[error("No API key for {provider}: pass api_key or set {env_var}")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Request failed: {0}")]
    Http(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Failed to parse response: {0}")]
    ParseFailed(String),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

impl LlmError {
    /// Short machine-readable code used in per-row error records.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedProvider { .. } => "unsupported_provider",
            Self::MissingApiKey { .. } => "missing_api_key",
            Self::Http(_) => "http_error",
            Self::Api { .. } => "api_error",
            Self::RateLimited { .. } => "rate_limited",
            Self::ParseFailed(_) => "parse_failed",
            Self::InvalidFormat(_) => "invalid_format",
            Self::Timeout(_) => "timeout",
        }
    }
}

// crates/core/src/llm/provider.rs
//! LlmProvider trait defining the interface for LLM integrations.

use async_trait::async_trait;

use super::types::{ClassificationRequest, LlmError};
use crate::classify::RowClassification;

/// Trait for LLM providers that can classify a row of text.
///
/// Implementations:
/// - `AnthropicProvider` — Anthropic Messages API
/// - `OpenAiCompatProvider` — OpenAI Chat Completions (also serves Groq)
/// - `GeminiProvider` — Google generateContent API
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Classify one row against the taxonomy carried in the request's system
    /// prompt, returning one structured result per taxonomy field.
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<RowClassification, LlmError>;

    /// Provider name for logging/display (e.g. "anthropic", "openai").
    fn name(&self) -> &str;

    /// Model identifier (e.g. "claude-3-5-sonnet-20241022").
    fn model(&self) -> &str;
}

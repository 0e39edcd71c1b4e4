// crates/core/src/llm/factory.rs
//! Provider factory — creates an LlmProvider from configuration.

use std::sync::Arc;

use super::anthropic::AnthropicProvider;
use super::config::{LlmConfig, ProviderKind};
use super::gemini::GeminiProvider;
use super::openai::OpenAiCompatProvider;
use super::provider::LlmProvider;
use super::types::LlmError;

/// Create an LLM provider based on the given configuration.
///
/// Resolves the credential first (explicit key, then the provider's env var)
/// so a missing key is reported before any request is made.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let api_key = config.resolve_api_key()?;
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Claude => Arc::new(
            AnthropicProvider::new(&config.model, api_key).with_timeout(config.timeout_secs),
        ),
        ProviderKind::OpenAi => Arc::new(
            OpenAiCompatProvider::openai(&config.model, api_key)
                .with_timeout(config.timeout_secs),
        ),
        ProviderKind::Groq => Arc::new(
            OpenAiCompatProvider::groq(&config.model, api_key).with_timeout(config.timeout_secs),
        ),
        ProviderKind::Gemini => Arc::new(
            GeminiProvider::new(&config.model, api_key).with_timeout(config.timeout_secs),
        ),
    };
    Ok(provider)
}

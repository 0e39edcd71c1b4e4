// crates/core/src/llm/mod.rs
//! LLM provider seam for row classification.
//!
//! Everything behind the [`LlmProvider`] trait is adapter code: HTTP
//! transport, provider API shape, and coercion of the model's JSON into a
//! [`crate::classify::RowClassification`]. The rest of the crate only sees
//! the trait.

pub mod anthropic;
pub mod config;
pub(crate) mod http;
pub mod factory;
pub mod gemini;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod types;

pub use anthropic::AnthropicProvider;
pub use config::{LlmConfig, ProviderKind};
pub use factory::create_provider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiCompatProvider;
pub use provider::LlmProvider;
pub use types::{ClassificationRequest, LlmError};

// crates/core/src/llm/config.rs
//! Provider enumeration and configuration.

use serde::{Deserialize, Serialize};

use super::types::LlmError;

/// The closed set of supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Claude,
    OpenAi,
    Gemini,
    Groq,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [Self::Claude, Self::OpenAi, Self::Gemini, Self::Groq];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Groq => "groq",
        }
    }

    /// Parse a caller-supplied provider identifier (case-insensitive).
    ///
    /// An unrecognized identifier is a structured error naming the allowed
    /// set, never a panic.
    pub fn parse(s: &str) -> Result<Self, LlmError> {
        match s.to_ascii_lowercase().as_str() {
            "claude" | "anthropic" => Ok(Self::Claude),
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            "groq" => Ok(Self::Groq),
            _ => Err(LlmError::UnsupportedProvider {
                given: s.to_string(),
                allowed: "'claude', 'openai', 'gemini', or 'groq'".to_string(),
            }),
        }
    }

    /// Environment variable the provider's credential is read from when no
    /// explicit key is supplied.
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Claude => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Claude => "claude-3-5-sonnet-20241022",
            Self::OpenAi => "gpt-4o-mini",
            Self::Gemini => "gemini-1.5-flash",
            Self::Groq => "llama-3.1-70b-versatile",
        }
    }

    /// Representative models, surfaced by the info tool.
    pub fn known_models(&self) -> &'static [&'static str] {
        match self {
            Self::Claude => &[
                "claude-3-5-sonnet-20241022",
                "claude-3-opus-20240229",
                "claude-3-haiku-20240307",
            ],
            Self::OpenAi => &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo"],
            Self::Gemini => &["gemini-1.5-pro", "gemini-1.5-flash"],
            Self::Groq => &["llama-3.1-70b-versatile", "mixtral-8x7b-32768"],
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for an LLM provider instance.
///
/// The credential travels here explicitly and is handed to the adapter; it is
/// never written into the process environment, so concurrent invocations with
/// different keys cannot race.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_concurrency: usize,
}

impl LlmConfig {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: None,
            timeout_secs: 60,
            max_concurrency: 8,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Resolve the credential: explicit key wins, else the provider's
    /// environment variable.
    pub fn resolve_api_key(&self) -> Result<String, LlmError> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }
        std::env::var(self.provider.env_var()).map_err(|_| LlmError::MissingApiKey {
            provider: self.provider.to_string(),
            env_var: self.provider.env_var().to_string(),
        })
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        let provider = ProviderKind::Claude;
        Self::new(provider, provider.default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_providers() {
        assert_eq!(ProviderKind::parse("claude").unwrap(), ProviderKind::Claude);
        assert_eq!(ProviderKind::parse("OpenAI").unwrap(), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::parse("GROQ").unwrap(), ProviderKind::Groq);
    }

    #[test]
    fn test_parse_unknown_provider_names_allowed_set() {
        let err = ProviderKind::parse("watson").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("watson"));
        assert!(msg.contains("'claude', 'openai', 'gemini', or 'groq'"));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = LlmConfig::new(ProviderKind::Claude, "m")
            .with_api_key(Some("sk-explicit".to_string()));
        assert_eq!(config.resolve_api_key().unwrap(), "sk-explicit");
    }

    #[test]
    fn test_env_var_table() {
        assert_eq!(ProviderKind::Claude.env_var(), "ANTHROPIC_API_KEY");
        assert_eq!(ProviderKind::OpenAi.env_var(), "OPENAI_API_KEY");
        assert_eq!(ProviderKind::Gemini.env_var(), "GEMINI_API_KEY");
        assert_eq!(ProviderKind::Groq.env_var(), "GROQ_API_KEY");
    }
}

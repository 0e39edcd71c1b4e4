// crates/core/src/llm/anthropic.rs
//! Anthropic Messages API provider.

use async_trait::async_trait;
use serde_json::json;

use super::http;
use super::prompt::parse_row_classification;
use super::provider::LlmProvider;
use super::types::{ClassificationRequest, LlmError};
use crate::classify::RowClassification;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM provider backed by Anthropic's Messages API.
pub struct AnthropicProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl AnthropicProvider {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs: 60,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Override the API endpoint (tests point this at a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<RowClassification, LlmError> {
        let body = json!({
            "model": self.model,
            "max_tokens": 1024,
            "system": request.system_prompt,
            "messages": [{"role": "user", "content": request.user_prompt}],
        });

        let reply = http::send_json(
            self.name(),
            self.client
                .post(format!("{}/v1/messages", self.base_url))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body),
            self.timeout_secs,
        )
        .await?;

        let content = reply["content"][0]["text"].as_str().ok_or_else(|| {
            LlmError::InvalidFormat("reply has no content[0].text".to_string())
        })?;
        parse_row_classification(content, &request.fields)
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

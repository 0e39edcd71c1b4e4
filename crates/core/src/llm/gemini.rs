// crates/core/src/llm/gemini.rs
//! Google Gemini generateContent provider.

use async_trait::async_trait;
use serde_json::json;

use super::http;
use super::prompt::parse_row_classification;
use super::provider::LlmProvider;
use super::types::{ClassificationRequest, LlmError};
use crate::classify::RowClassification;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// LLM provider backed by Google's generateContent API.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiProvider {
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
impl LlmProvider for GeminiProvider {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<RowClassification, LlmError> {
        let body = json!({
            "system_instruction": {"parts": [{"text": request.system_prompt}]},
            "contents": [{"parts": [{"text": request.user_prompt}]}],
            "generationConfig": {"responseMimeType": "application/json"},
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let reply = http::send_json(
            self.name(),
            self.client
                .post(url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body),
            self.timeout_secs,
        )
        .await?;

        let content = reply["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                LlmError::InvalidFormat(
                    "reply has no candidates[0].content.parts[0].text".to_string(),
                )
            })?;
        parse_row_classification(content, &request.fields)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_classify_parses_candidates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_header("x-goog-api-key", "g-test")
            .with_status(200)
            .with_body(
                r#"{"candidates": [{"content": {"parts": [
                    {"text": "{\"topic\": {\"value\": \"sports\", \"confidence\": \"low\"}}"}]}}]}"#,
            )
            .create_async()
            .await;

        let provider =
            GeminiProvider::new("gemini-1.5-flash", "g-test").with_base_url(server.url());
        let row = provider
            .classify(&ClassificationRequest {
                system_prompt: "classify".to_string(),
                user_prompt: "hello".to_string(),
                fields: vec!["topic".to_string()],
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(row["topic"].value, "sports");
    }
}

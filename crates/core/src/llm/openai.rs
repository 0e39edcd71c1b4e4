// crates/core/src/llm/openai.rs
//! OpenAI-compatible Chat Completions provider.
//!
//! Serves both OpenAI and Groq: Groq exposes the same wire format under its
//! own base URL, so the two kinds share this adapter.

use async_trait::async_trait;
use serde_json::json;

use super::http;
use super::prompt::parse_row_classification;
use super::provider::LlmProvider;
use super::types::{ClassificationRequest, LlmError};
use crate::classify::RowClassification;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai";

/// LLM provider for OpenAI-compatible Chat Completions endpoints.
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    name: &'static str,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiCompatProvider {
    pub fn openai(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_endpoint("openai", OPENAI_BASE_URL, model, api_key)
    }

    pub fn groq(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_endpoint("groq", GROQ_BASE_URL, model, api_key)
    }

    fn with_endpoint(
        name: &'static str,
        base_url: &str,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            name,
            base_url: base_url.to_string(),
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
impl LlmProvider for OpenAiCompatProvider {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<RowClassification, LlmError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.user_prompt},
            ],
            "response_format": {"type": "json_object"},
        });

        let reply = http::send_json(
            self.name(),
            self.client
                .post(format!("{}/v1/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body),
            self.timeout_secs,
        )
        .await?;

        let content = reply["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                LlmError::InvalidFormat("reply has no choices[0].message.content".to_string())
            })?;
        parse_row_classification(content, &request.fields)
    }

    fn name(&self) -> &str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Confidence;

    #[tokio::test]
    async fn test_classify_parses_chat_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(
                r#"{"choices": [{"message": {"role": "assistant",
                    "content": "{\"topic\": {\"value\": \"politics\", \"confidence\": \"medium\"}}"}}]}"#,
            )
            .create_async()
            .await;

        let provider =
            OpenAiCompatProvider::openai("gpt-4o-mini", "sk-test").with_base_url(server.url());
        let row = provider
            .classify(&ClassificationRequest {
                system_prompt: "classify".to_string(),
                user_prompt: "hello".to_string(),
                fields: vec!["topic".to_string()],
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(row["topic"].value, "politics");
        assert_eq!(row["topic"].confidence, Confidence::Medium);
    }

    #[test]
    fn test_groq_uses_its_own_name() {
        let provider = OpenAiCompatProvider::groq("llama-3.1-70b-versatile", "gsk-test");
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.model(), "llama-3.1-70b-versatile");
    }
}

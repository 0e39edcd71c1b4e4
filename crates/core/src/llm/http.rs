// crates/core/src/llm/http.rs
//! Shared HTTP plumbing for provider adapters.

use serde_json::Value;

use super::types::LlmError;

/// Send a JSON API request and return the parsed JSON body.
///
/// Maps transport and status failures onto [`LlmError`]: request timeout →
/// `Timeout`, HTTP 429 → `RateLimited` (honoring `retry-after`), any other
/// non-success status → `Api` with a truncated body.
pub(crate) async fn send_json(
    provider: &str,
    request: reqwest::RequestBuilder,
    timeout_secs: u64,
) -> Result<Value, LlmError> {
    let t0 = std::time::Instant::now();
    let response = request
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                tracing::error!(provider, timeout_secs, "LLM request timed out");
                LlmError::Timeout(timeout_secs)
            } else {
                tracing::error!(provider, error = %e, "LLM request failed");
                LlmError::Http(e.to_string())
            }
        })?;

    let status = response.status();
    if status.as_u16() == 429 {
        let retry_after_secs = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        tracing::warn!(provider, retry_after_secs, "LLM request rate limited");
        return Err(LlmError::RateLimited { retry_after_secs });
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message: String = body.chars().take(500).collect();
        tracing::error!(provider, status = status.as_u16(), %message, "LLM API error");
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let json = response
        .json::<Value>()
        .await
        .map_err(|e| LlmError::ParseFailed(format!("invalid JSON body: {e}")))?;
    tracing::debug!(
        provider,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "LLM response received"
    );
    Ok(json)
}

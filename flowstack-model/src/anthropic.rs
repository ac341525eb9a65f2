//! Anthropic generation provider using the messages API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::provider::GenerationProvider;

/// The Anthropic messages endpoint.
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// The API version header value the messages API requires.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Token cap for responses; the workflow canvas exposes no length control.
const MAX_TOKENS: u32 = 1024;

/// A [`GenerationProvider`] backed by the Anthropic messages API.
pub struct AnthropicProvider {
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a new provider.
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }

    fn err(message: impl Into<String>) -> ModelError {
        ModelError::Provider { provider: "anthropic".to_string(), message: message.into() }
    }
}

impl Default for AnthropicProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Anthropic API request/response types ───────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl GenerationProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, prompt: &str, model: &str, api_key: &str) -> Result<String> {
        debug!(provider = "anthropic", model, prompt_len = prompt.len(), "generation request");

        let request_body = MessagesRequest {
            model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message { role: "user", content: prompt }],
        };

        let response = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "anthropic", error = %e, "request failed");
                Self::err(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "anthropic", %status, "API error");
            return Err(Self::err(format!("API returned {status}: {detail}")));
        }

        let messages_response: MessagesResponse = response.json().await.map_err(|e| {
            error!(provider = "anthropic", error = %e, "failed to parse response");
            Self::err(format!("failed to parse response: {e}"))
        })?;

        let text: String =
            messages_response.content.into_iter().map(|block| block.text).collect();
        if text.is_empty() {
            return Err(Self::err("API returned no text content"));
        }
        Ok(text)
    }
}

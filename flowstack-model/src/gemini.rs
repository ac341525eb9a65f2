//! Gemini generation provider using the generateContent API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::provider::GenerationProvider;

/// Base URL for the generative language API.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A [`GenerationProvider`] backed by the Gemini generateContent API.
pub struct GeminiProvider {
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new provider.
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }

    fn err(message: impl Into<String>) -> ModelError {
        ModelError::Provider { provider: "gemini".to_string(), message: message.into() }
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
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
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str, model: &str, api_key: &str) -> Result<String> {
        debug!(provider = "gemini", model, prompt_len = prompt.len(), "generation request");

        let url = format!("{GEMINI_BASE_URL}/{model}:generateContent");
        let request_body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "gemini", error = %e, "request failed");
                Self::err(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "gemini", %status, "API error");
            return Err(Self::err(format!("API returned {status}: {detail}")));
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = "gemini", error = %e, "failed to parse response");
            Self::err(format!("failed to parse response: {e}"))
        })?;

        let text: String = generate_response
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            return Err(Self::err("API returned no candidate text"));
        }
        Ok(text)
    }
}

//! Web search via SerpAPI.
//!
//! The search result feed is advisory context for generation: the
//! execution engine treats every failure mode here (network errors,
//! non-success statuses, the 10-second timeout) as "zero results".

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ModelError, Result};

/// The SerpAPI search endpoint.
const SERPAPI_URL: &str = "https://serpapi.com/search";

/// Upper bound on how long one search request may take.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One external search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebSearchResult {
    /// The result's page title.
    pub title: String,
    /// A short extract of the page content.
    pub snippet: String,
    /// The result's URL.
    pub url: String,
}

/// A provider of external web search results.
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Fetch up to `max_results` results for `query`.
    async fn search(
        &self,
        query: &str,
        api_key: &str,
        max_results: usize,
    ) -> Result<Vec<WebSearchResult>>;
}

/// A [`WebSearchProvider`] backed by SerpAPI's Google engine.
pub struct SerpApiClient {
    client: reqwest::Client,
}

impl SerpApiClient {
    /// Create a new client with the bounded search timeout applied.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for SerpApiClient {
    fn default() -> Self {
        Self::new()
    }
}

// ── SerpAPI response types ─────────────────────────────────────────

#[derive(Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

#[async_trait]
impl WebSearchProvider for SerpApiClient {
    async fn search(
        &self,
        query: &str,
        api_key: &str,
        max_results: usize,
    ) -> Result<Vec<WebSearchResult>> {
        debug!(query, max_results, "web search request");

        let num = max_results.to_string();
        let response = self
            .client
            .get(SERPAPI_URL)
            .query(&[
                ("q", query),
                ("api_key", api_key),
                ("num", num.as_str()),
                ("engine", "google"),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "web search request failed");
                ModelError::WebSearch { message: format!("request failed: {e}") }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "web search returned non-success status");
            return Err(ModelError::WebSearch { message: format!("API returned {status}") });
        }

        let serp: SerpResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "failed to parse web search response");
            ModelError::WebSearch { message: format!("failed to parse response: {e}") }
        })?;

        let results: Vec<WebSearchResult> = serp
            .organic_results
            .into_iter()
            .take(max_results)
            .map(|r| WebSearchResult { title: r.title, snippet: r.snippet, url: r.link })
            .collect();

        debug!(count = results.len(), "web search completed");
        Ok(results)
    }
}

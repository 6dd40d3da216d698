//! Web search context: Serper (Google) results rendered as text.
//!
//! Sends `{"q": query, "num": n}` to the search endpoint and renders the
//! top results as `"<title>: <snippet>"` lines.

use async_trait::async_trait;
use chatroute_config::{AppConfig, usable_secret};
use chatroute_core::context::ContextProvider;
use chatroute_core::error::ContextError;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Rendered when the endpoint answers with zero organic results.
pub const NO_RESULTS: &str = "No search results found.";

pub struct SearchProvider {
    api_key: Option<String>,
    api_url: String,
    num_results: u32,
    top_k: usize,
    client: reqwest::Client,
}

impl SearchProvider {
    pub fn new(api_key: Option<&str>, api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: usable_secret(api_key).map(String::from),
            api_url: api_url.into(),
            num_results: 5,
            top_k: 3,
            client: crate::http_client(timeout),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.search_key(),
            &config.search.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )
        .with_limits(config.search.num_results, config.search.top_k)
    }

    /// Set the result-count hint sent upstream and how many results are kept.
    pub fn with_limits(mut self, num_results: u32, top_k: usize) -> Self {
        self.num_results = num_results;
        self.top_k = top_k.max(1);
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Render the first `top_k` results, one per line.
    fn render(response: &SearchResponse, top_k: usize) -> String {
        let lines: Vec<String> = response
            .organic
            .iter()
            .take(top_k)
            .map(|r| format!("{}: {}", r.title, r.snippet))
            .collect();

        if lines.is_empty() {
            NO_RESULTS.to_string()
        } else {
            lines.join("\n")
        }
    }
}

#[async_trait]
impl ContextProvider for SearchProvider {
    fn name(&self) -> &str {
        "search"
    }

    async fn lookup(&self, query: &str) -> Result<String, ContextError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ContextError::credential_missing("search"))?;

        debug!(query = %query, num = self.num_results, "Sending search request");

        let response = self
            .client
            .post(&self.api_url)
            .header("X-API-KEY", api_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "q": query, "num": self.num_results }))
            .send()
            .await
            .map_err(|e| ContextError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ContextError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ContextError::UpstreamData(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ContextError::UpstreamData(format!("invalid search response: {e}")))?;

        Ok(Self::render(&parsed, self.top_k))
    }

    fn fallback(&self, _query: &str, error: &ContextError) -> String {
        match error {
            ContextError::CredentialMissing { .. } => {
                "Search unavailable: no search API key configured.".to_string()
            }
            other => format!("Search error: {other}"),
        }
    }
}

// --- Serper API types (internal) ---

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

//! Context providers for chatroute.
//!
//! Context providers fetch a little real-time information to fold into
//! the system prompt: web search results and current weather. Both
//! implement `chatroute_core::ContextProvider`, so a failed lookup turns
//! into a placeholder sentence instead of an error.

pub mod search;
pub mod weather;

use std::time::Duration;

pub use search::SearchProvider;
pub use weather::WeatherProvider;

/// Shared HTTP client construction with a per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

//! Context providers: auxiliary lookups folded into the system prompt.
//!
//! A context provider turns one parameter (a search query, a city name)
//! into a short block of text. Lookups can fail in several ways, but a
//! provider never lets a failure escape: [`ContextProvider::fetch`] always
//! yields text, either the rendered lookup or the provider's fallback
//! sentence for that error.

use async_trait::async_trait;
use tracing::{debug, warn};
use crate::error::ContextError;

#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// A short name for logs (e.g., "search", "weather").
    fn name(&self) -> &str;

    /// Perform the lookup and render it, or report why it failed.
    async fn lookup(&self, parameter: &str) -> std::result::Result<String, ContextError>;

    /// The placeholder sentence shown to the model when `lookup` fails.
    fn fallback(&self, parameter: &str, error: &ContextError) -> String;

    /// Lookup that never fails.
    async fn fetch(&self, parameter: &str) -> String {
        match self.lookup(parameter).await {
            Ok(text) => {
                debug!(provider = %self.name(), chars = text.len(), "Context lookup succeeded");
                text
            }
            Err(e) => {
                warn!(provider = %self.name(), error = %e, "Context lookup failed, using fallback");
                self.fallback(parameter, &e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flaky {
        fail: bool,
    }

    #[async_trait]
    impl ContextProvider for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn lookup(&self, parameter: &str) -> Result<String, ContextError> {
            if self.fail {
                Err(ContextError::Network("connection reset".into()))
            } else {
                Ok(format!("data for {parameter}"))
            }
        }

        fn fallback(&self, parameter: &str, error: &ContextError) -> String {
            format!("flaky unavailable for {parameter}: {error}")
        }
    }

    #[tokio::test]
    async fn fetch_returns_lookup_text() {
        let provider = Flaky { fail: false };
        assert_eq!(provider.fetch("x").await, "data for x");
    }

    #[tokio::test]
    async fn fetch_converts_failure_into_fallback() {
        let provider = Flaky { fail: true };
        let text = provider.fetch("x").await;
        assert_eq!(text, "flaky unavailable for x: network failure: connection reset");
    }
}

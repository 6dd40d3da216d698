//! Error types for the chatroute domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; none of them escape a
//! conversation turn (providers convert them into placeholder text).

use thiserror::Error;

// --- Bounded context errors ---

/// Failures of the completion (LLM) endpoint.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of a context lookup (search or weather).
///
/// An empty search result set is *not* an error: it is a successful lookup
/// rendered as a "no results" sentence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The provider's API key is absent or still a template placeholder.
    #[error("no {provider} API key configured")]
    CredentialMissing { provider: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("network failure: {0}")]
    Network(String),

    /// The response arrived but did not have the expected shape.
    #[error("unexpected response: {0}")]
    UpstreamData(String),

    /// The upstream reported that the requested location does not exist.
    #[error("{0}")]
    LocationNotFound(String),
}

impl ContextError {
    pub fn credential_missing(provider: impl Into<String>) -> Self {
        Self::CredentialMissing {
            provider: provider.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn context_error_displays_provider_name() {
        let err = ContextError::credential_missing("search");
        assert_eq!(err.to_string(), "no search API key configured");
    }
}

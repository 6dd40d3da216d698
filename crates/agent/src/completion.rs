//! Completion step: wraps a [`Provider`] so a turn always gets text back.
//!
//! Errors from the endpoint become an apology sentence; a missing provider
//! (no usable API key) short-circuits without any network call.

use std::sync::Arc;
use chatroute_config::AppConfig;
use chatroute_core::message::Turn;
use chatroute_core::provider::{Provider, ProviderRequest};
use tracing::{debug, warn};
use crate::prompt;

/// Reply used when no completion provider could be configured.
pub const NOT_CONFIGURED: &str =
    "Sorry, the AI service is not configured (missing completion API key).";

pub struct Completer {
    provider: Option<Arc<dyn Provider>>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl Completer {
    pub fn new(provider: Option<Arc<dyn Provider>>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    /// Model, temperature and max tokens from config. A provider section's
    /// `default_model` wins over the top-level one.
    pub fn from_config(config: &AppConfig, provider: Option<Arc<dyn Provider>>) -> Self {
        let model = config
            .providers
            .get(&config.default_provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| config.default_model.clone());

        Self::new(provider, model)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a reply. Never fails; history is only read.
    pub async fn complete(&self, directive: &str, history: &[Turn], input: &str) -> String {
        let Some(provider) = &self.provider else {
            warn!("No completion provider configured");
            return NOT_CONFIGURED.to_string();
        };

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: prompt::assemble(directive, history, input),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match provider.complete(request).await {
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    debug!(
                        model = %response.model,
                        total_tokens = usage.total_tokens,
                        "Completion finished"
                    );
                }
                response.message.content
            }
            Err(e) => {
                warn!(provider = %provider.name(), error = %e, "Completion failed");
                format!("Sorry, AI processing error: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::RecordingProvider;
    use chatroute_core::error::ProviderError;
    use chatroute_core::message::{Message, Role};

    #[tokio::test]
    async fn missing_provider_short_circuits() {
        let completer = Completer::new(None, "gpt-3.5-turbo");
        assert!(!completer.is_configured());
        assert_eq!(completer.complete("sys", &[], "hi").await, NOT_CONFIGURED);
    }

    #[tokio::test]
    async fn sends_assembled_messages() {
        let provider = Arc::new(RecordingProvider::replying("Hello!"));
        let completer = Completer::new(Some(provider.clone()), "gpt-3.5-turbo")
            .with_temperature(0.2)
            .with_max_tokens(500);

        let history = vec![Turn::new("earlier", "reply")];
        let out = completer.complete("sys", &history, "now").await;
        assert_eq!(out, "Hello!");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.model, "gpt-3.5-turbo");
        assert_eq!(req.max_tokens, Some(500));
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(req.messages.first().unwrap().role, Role::System);
        assert_eq!(req.messages.last().unwrap(), &Message::user("now"));
        assert_eq!(req.messages.len(), 4);
    }

    #[test]
    fn provider_section_model_overrides_default() {
        let mut config = AppConfig::default();
        assert_eq!(Completer::from_config(&config, None).model(), "gpt-3.5-turbo");

        config.providers.insert(
            "openai".into(),
            chatroute_config::ProviderConfig {
                api_key: None,
                api_url: None,
                default_model: Some("gpt-4o-mini".into()),
            },
        );
        assert_eq!(Completer::from_config(&config, None).model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn provider_error_becomes_apology() {
        let provider = Arc::new(RecordingProvider::failing(ProviderError::Network(
            "connection refused".into(),
        )));
        let completer = Completer::new(Some(provider), "m");
        let out = completer.complete("sys", &[], "hi").await;
        assert_eq!(out, "Sorry, AI processing error: Network error: connection refused");
    }
}

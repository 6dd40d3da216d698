//! Provider router: selects the completion provider based on config.
//!
//! Providers that need an API key are only registered when a usable key
//! exists, so a missing credential shows up as "no default provider"
//! instead of a doomed network call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use chatroute_config::{AppConfig, usable_secret};
use chatroute_core::provider::Provider;
use tracing::{debug, info};
use crate::openai_compat::OpenAiCompatProvider;

/// Holds the configured completion providers.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    pub fn default_name(&self) -> &str {
        &self.default_provider
    }

    /// List all registered provider names.
    pub fn list(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }
}

/// Build providers from configuration.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);
    let timeout = Duration::from_secs(config.request_timeout_secs);

    for (name, provider_config) in &config.providers {
        let api_key = usable_secret(provider_config.api_key.as_deref())
            .or_else(|| usable_secret(config.api_key.as_deref()));
        let base_url = provider_config
            .api_url
            .clone()
            .unwrap_or_else(|| default_base_url(name));

        if let Some(provider) = make_provider(name, &base_url, api_key, timeout) {
            router.register(name.clone(), provider);
        }
    }

    if router.get(&config.default_provider).is_none() {
        let base_url = default_base_url(&config.default_provider);
        if let Some(provider) = make_provider(
            &config.default_provider,
            &base_url,
            config.completion_key(),
            timeout,
        ) {
            router.register(config.default_provider.clone(), provider);
        }
    }

    match router.default() {
        Some(p) => info!(provider = %p.name(), "Completion provider ready"),
        None => info!(
            provider = %config.default_provider,
            "Completion provider not registered (no API key)"
        ),
    }

    router
}

fn make_provider(
    name: &str,
    base_url: &str,
    api_key: Option<&str>,
    timeout: Duration,
) -> Option<Arc<dyn Provider>> {
    let key = match api_key {
        Some(k) => k.to_string(),
        None if is_keyless(name) => name.to_string(),
        None => {
            debug!(provider = %name, "Skipping provider without API key");
            return None;
        }
    };
    Some(Arc::new(OpenAiCompatProvider::with_timeout(
        name, base_url, key, timeout,
    )))
}

/// Local servers that accept any bearer token.
fn is_keyless(provider_name: &str) -> bool {
    matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

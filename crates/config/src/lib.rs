//! Configuration loading, validation, and management for chatroute.
//!
//! Loads configuration from `~/.chatroute/config.toml` with environment
//! variable overrides. Validates all settings at startup. The resulting
//! [`AppConfig`] is built once in `main` and handed to the provider and
//! agent builders; nothing reads configuration from ambient state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.chatroute/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Timeout applied to every outbound HTTP request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Persona, history bounds, and routing defaults
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Web search endpoint
    #[serde(default)]
    pub search: SearchConfig,

    /// Weather endpoint
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    500
}
fn default_request_timeout() -> u64 {
    10
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("assistant", &self.assistant)
            .field("search", &self.search)
            .field("weather", &self.weather)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("num_results", &self.num_results)
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Persona directive placed at the top of every system message
    #[serde(default = "default_persona")]
    pub persona: String,

    /// Maximum number of turns kept in history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// How many of the most recent turns are replayed to the model
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// City used when a weather question names no location
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Optional JSON file the CLI loads history from and saves it to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
}

fn default_persona() -> String {
    "You are a helpful AI assistant with access to real-time internet data. \
     Be helpful, witty, and informative."
        .into()
}
fn default_history_capacity() -> usize {
    10
}
fn default_history_window() -> usize {
    5
}
fn default_city() -> String {
    "Delhi".into()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            persona: default_persona(),
            history_capacity: default_history_capacity(),
            history_window: default_history_window(),
            default_city: default_city(),
            history_file: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_search_url")]
    pub api_url: String,

    /// Result-count hint sent to the endpoint
    #[serde(default = "default_num_results")]
    pub num_results: u32,

    /// How many results are rendered into the context
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_search_url() -> String {
    "https://google.serper.dev/search".into()
}
fn default_num_results() -> u32 {
    5
}
fn default_top_k() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_search_url(),
            num_results: default_num_results(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_weather_url")]
    pub api_url: String,
}

fn default_weather_url() -> String {
    "https://api.weatherapi.com/v1/current.json".into()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_weather_url(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// Treat empty strings and template values such as
/// `your-openai-api-key-here` as "no key".
pub fn usable_secret(value: Option<&str>) -> Option<&str> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }
    let lower = v.to_ascii_lowercase();
    if lower.starts_with("your-") || lower.starts_with("your_") || lower.ends_with("-here") {
        return None;
    }
    Some(v)
}

impl AppConfig {
    /// Load configuration from the default path (~/.chatroute/config.toml).
    ///
    /// Then applies environment overrides. Keys from the environment only
    /// fill slots the file left empty:
    /// - `CHATROUTE_API_KEY`, `OPENAI_API_KEY`, `OPENROUTER_API_KEY`
    /// - `SERPER_API_KEY`
    /// - `WEATHER_API_KEY`
    ///
    /// `CHATROUTE_PROVIDER`, `CHATROUTE_MODEL` and `CHATROUTE_HISTORY_FILE`
    /// always win over the file.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup function.
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_usable = |names: &[&str]| {
            names
                .iter()
                .filter_map(|n| env(n))
                .find(|v| usable_secret(Some(v.as_str())).is_some())
        };

        if usable_secret(self.api_key.as_deref()).is_none() {
            self.api_key = first_usable(&["CHATROUTE_API_KEY", "OPENAI_API_KEY", "OPENROUTER_API_KEY"]);
        }
        if usable_secret(self.search.api_key.as_deref()).is_none() {
            self.search.api_key = first_usable(&["SERPER_API_KEY"]);
        }
        if usable_secret(self.weather.api_key.as_deref()).is_none() {
            self.weather.api_key = first_usable(&["WEATHER_API_KEY"]);
        }

        if let Some(provider) = env("CHATROUTE_PROVIDER") {
            self.default_provider = provider;
        }
        if let Some(model) = env("CHATROUTE_MODEL") {
            self.default_model = model;
        }
        if let Some(path) = env("CHATROUTE_HISTORY_FILE") {
            self.assistant.history_file = Some(PathBuf::from(path));
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".chatroute")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.assistant.history_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "assistant.history_capacity must be at least 1".into(),
            ));
        }

        if self.search.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "search.top_k must be at least 1".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// The completion key for the default provider, if usable.
    pub fn completion_key(&self) -> Option<&str> {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| usable_secret(p.api_key.as_deref()))
            .or_else(|| usable_secret(self.api_key.as_deref()))
    }

    pub fn search_key(&self) -> Option<&str> {
        usable_secret(self.search.api_key.as_deref())
    }

    pub fn weather_key(&self) -> Option<&str> {
        usable_secret(self.weather.api_key.as_deref())
    }

    /// Replay window actually used: never larger than the history itself.
    pub fn effective_history_window(&self) -> usize {
        self.assistant.history_window.min(self.assistant.history_capacity)
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout(),
            assistant: AssistantConfig::default(),
            search: SearchConfig::default(),
            weather: WeatherConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

//! Weather context: current conditions from WeatherAPI.
//!
//! `GET <api_url>?key=<key>&q=<city>`; the `location` and `current`
//! objects are rendered into one sentence. An `error` object in the body
//! means the upstream could not resolve the city.

use async_trait::async_trait;
use chatroute_config::{AppConfig, usable_secret};
use chatroute_core::context::ContextProvider;
use chatroute_core::error::ContextError;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub struct WeatherProvider {
    api_key: Option<String>,
    api_url: String,
    client: reqwest::Client,
}

impl WeatherProvider {
    pub fn new(api_key: Option<&str>, api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: usable_secret(api_key).map(String::from),
            api_url: api_url.into(),
            client: crate::http_client(timeout),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.weather_key(),
            &config.weather.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Interpret a response body. Error objects win over everything else.
    fn parse(body: &str) -> Result<String, ContextError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ContextError::UpstreamData(format!("invalid weather response: {e}")))?;

        if let Some(error) = value.get("error").filter(|e| e.is_object()) {
            let message = error["message"]
                .as_str()
                .unwrap_or("location not found")
                .to_string();
            return Err(ContextError::LocationNotFound(message));
        }

        let report: WeatherReport = serde_json::from_value(value)
            .map_err(|e| ContextError::UpstreamData(format!("incomplete weather response: {e}")))?;

        Ok(Self::render(&report))
    }

    fn render(report: &WeatherReport) -> String {
        format!(
            "Weather in {}, {}: {}°C, {}, Feels like {}°C",
            report.location.name,
            report.location.country,
            report.current.temp_c,
            report.current.condition.text,
            report.current.feelslike_c,
        )
    }
}

#[async_trait]
impl ContextProvider for WeatherProvider {
    fn name(&self) -> &str {
        "weather"
    }

    async fn lookup(&self, city: &str) -> Result<String, ContextError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ContextError::credential_missing("weather"))?;

        debug!(city = %city, "Sending weather request");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("key", api_key), ("q", city)])
            .send()
            .await
            .map_err(|e| ContextError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ContextError::Network(e.to_string()))?;

        // WeatherAPI reports unknown cities as 400 with an error object,
        // so the body is inspected before the status.
        match Self::parse(&body) {
            Err(ContextError::UpstreamData(_)) if !status.is_success() => Err(
                ContextError::UpstreamData(format!("HTTP {}", status.as_u16())),
            ),
            other => other,
        }
    }

    fn fallback(&self, city: &str, error: &ContextError) -> String {
        match error {
            ContextError::LocationNotFound(message) => {
                format!("Could not find weather for '{city}': {message}")
            }
            other => format!("Weather unavailable for '{city}': {other}"),
        }
    }
}

// --- WeatherAPI types (internal) ---

#[derive(Debug, Deserialize)]
struct WeatherReport {
    location: Location,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    condition: Condition,
    feelslike_c: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

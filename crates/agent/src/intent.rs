//! Intent classification: keyword routing of a user message.
//!
//! Rules are checked in priority order and the first match wins:
//!
//! 1. weather tokens (`weather`, `temperature`, `temp`) → [`Intent::Weather`]
//! 2. search tokens (`search`, `google`, `find`, `who is`, `what is`,
//!    `find out`) → [`Intent::Search`]
//! 3. anything else → [`Intent::Chat`]
//!
//! Matching is plain substring containment on the lowercased text, so
//! "attempt" counts as a weather message. Classification never fails.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Substrings that mark a weather question.
pub const WEATHER_TRIGGERS: &[&str] = &["weather", "temperature", "temp"];

/// Substrings that mark a search request.
pub const SEARCH_TRIGGERS: &[&str] = &["search", "google", "find", "who is", "what is", "find out"];

/// City used when a weather question names no location.
pub const DEFAULT_CITY: &str = "Delhi";

static CITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:weather|temperature|temp)\s+(?:in|at|for)\s+([^?!.,;:\d]+)")
        .expect("city pattern is a valid regex")
});

// Longest alternatives first so "find out" is removed as one token.
static SEARCH_STRIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)find out|who is|what is|search|google|find")
        .expect("search trigger pattern is a valid regex")
});

/// What a message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Weather { city: String },
    Search { query: String },
    Chat,
}

impl Intent {
    /// The extracted parameter; empty for chat.
    pub fn parameter(&self) -> &str {
        match self {
            Intent::Weather { city } => city,
            Intent::Search { query } => query,
            Intent::Chat => "",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Weather { .. } => "weather",
            Intent::Search { .. } => "search",
            Intent::Chat => "chat",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Chat => write!(f, "chat"),
            other => write!(f, "{}({})", other.kind(), other.parameter()),
        }
    }
}

/// Classifies messages; carries the default-city fallback.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    default_city: String,
}

impl IntentClassifier {
    pub fn new(default_city: impl Into<String>) -> Self {
        Self {
            default_city: default_city.into(),
        }
    }

    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    pub fn classify(&self, text: &str) -> Intent {
        let lower = text.to_lowercase();

        if WEATHER_TRIGGERS.iter().any(|t| lower.contains(t)) {
            let city = extract_city(text).unwrap_or_else(|| self.default_city.clone());
            return Intent::Weather { city };
        }

        if SEARCH_TRIGGERS.iter().any(|t| lower.contains(t)) {
            return Intent::Search {
                query: extract_query(text),
            };
        }

        Intent::Chat
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

/// `"weather in New York?"` → `Some("New York")`, keeping the user's casing.
fn extract_city(text: &str) -> Option<String> {
    let caps = CITY_PATTERN.captures(text)?;
    let city = caps
        .get(1)?
        .as_str()
        .trim()
        .trim_end_matches(['\'', '-'])
        .trim();
    (!city.is_empty()).then(|| city.to_string())
}

/// Strip trigger tokens; fall back to the whole message if nothing is left.
fn extract_query(text: &str) -> String {
    let stripped = SEARCH_STRIP.replace_all(text, " ");
    let query = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if query.is_empty() {
        text.trim().to_string()
    } else {
        query
    }
}

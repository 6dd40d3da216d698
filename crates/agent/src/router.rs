//! The conversation router: one instance per chat session.
//!
//! For each message:
//!
//! 1. **Classify** the text into weather / search / chat
//! 2. **Fetch context** from the matching provider (chat fetches nothing)
//! 3. **Complete** with the persona directive, recent turns and the input
//! 4. **Record** the turn in the bounded history
//!
//! Every step degrades to text, so `process` always returns a reply and
//! always records a turn. There are no retries.

use std::path::Path;
use std::sync::Arc;
use chatroute_config::AppConfig;
use chatroute_core::context::ContextProvider;
use chatroute_core::message::{SessionId, Turn};
use chatroute_context::{SearchProvider, WeatherProvider};
use tracing::{debug, info};
use crate::completion::Completer;
use crate::history::{History, HistoryError};
use crate::intent::{Intent, IntentClassifier};
use crate::prompt;

/// Default persona when none is configured.
pub const DEFAULT_PERSONA: &str = "You are a helpful AI assistant with access to real-time \
     internet data. Be helpful, witty, and informative.";

/// Default number of turns replayed into each completion.
pub const DEFAULT_WINDOW: usize = 5;

pub struct ConversationRouter {
    session: SessionId,
    classifier: IntentClassifier,
    search: Arc<dyn ContextProvider>,
    weather: Arc<dyn ContextProvider>,
    completer: Completer,
    persona: String,
    history: History,
    window: usize,
}

impl ConversationRouter {
    pub fn new(
        completer: Completer,
        search: Arc<dyn ContextProvider>,
        weather: Arc<dyn ContextProvider>,
    ) -> Self {
        Self {
            session: SessionId::new(),
            classifier: IntentClassifier::default(),
            search,
            weather,
            completer,
            persona: DEFAULT_PERSONA.to_string(),
            history: History::default(),
            window: DEFAULT_WINDOW,
        }
    }

    /// Wire up real providers from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let providers = chatroute_providers::build_from_config(config);
        let completer = Completer::from_config(config, providers.default());

        Self::new(
            completer,
            Arc::new(SearchProvider::from_config(config)),
            Arc::new(WeatherProvider::from_config(config)),
        )
        .with_classifier(IntentClassifier::new(&config.assistant.default_city))
        .with_persona(&config.assistant.persona)
        .with_history(History::new(config.assistant.history_capacity))
        .with_window(config.effective_history_window())
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Start from an existing history (e.g. loaded from disk).
    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    /// How many recent turns are replayed; clamped to the history capacity.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn completer(&self) -> &Completer {
        &self.completer
    }

    pub fn classify(&self, input: &str) -> Intent {
        self.classifier.classify(input)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn save_history(&self, path: &Path) -> Result<(), HistoryError> {
        self.history.save(path)
    }

    /// Fetch and label the context for an intent. Chat invokes no provider.
    pub async fn resolve_context(&self, intent: &Intent) -> String {
        let raw = match intent {
            Intent::Weather { city } => self.weather.fetch(city).await,
            Intent::Search { query } => self.search.fetch(query).await,
            Intent::Chat => return String::new(),
        };
        prompt::label_context(intent, &raw)
    }

    /// Handle one user message and return the assistant's reply.
    pub async fn process(&mut self, input: &str) -> String {
        let intent = self.classifier.classify(input);
        info!(
            session = %self.session,
            intent = intent.kind(),
            parameter = %intent.parameter(),
            "Routing message"
        );

        let context = self.resolve_context(&intent).await;
        let directive = prompt::directive(&self.persona, &context);
        let window = self.window.min(self.history.capacity());
        let replay = self.history.recent(window);

        let output = self.completer.complete(&directive, &replay, input).await;

        if let Some(evicted) = self.history.push(Turn::new(input, output.clone())) {
            debug!(
                session = %self.session,
                evicted_at = %evicted.created_at(),
                "History full, evicted oldest turn"
            );
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{RecordingContext, RecordingProvider};
    use chatroute_core::error::{ContextError, ProviderError};
    use chatroute_core::message::{Message, Role};

    struct Fixture {
        provider: Arc<RecordingProvider>,
        search: Arc<RecordingContext>,
        weather: Arc<RecordingContext>,
    }

    impl Fixture {
        fn new(provider: RecordingProvider, search: RecordingContext, weather: RecordingContext) -> Self {
            Self {
                provider: Arc::new(provider),
                search: Arc::new(search),
                weather: Arc::new(weather),
            }
        }

        fn ok() -> Self {
            Self::new(
                RecordingProvider::replying("generated reply"),
                RecordingContext::returning("search", "Rust: a language"),
                RecordingContext::returning("weather", "Weather in London, UK: 11°C, Light rain, Feels like 9°C"),
            )
        }

        fn router(&self) -> ConversationRouter {
            ConversationRouter::new(
                Completer::new(Some(self.provider.clone()), "mock-model"),
                self.search.clone(),
                self.weather.clone(),
            )
            .with_persona("PERSONA")
        }
    }

    #[tokio::test]
    async fn weather_scenario() {
        let fx = Fixture::ok();
        let mut router = fx.router();

        let out = router.process("weather in London").await;
        assert_eq!(out, "generated reply");

        assert_eq!(fx.weather.calls(), vec!["London"]);
        assert!(fx.search.calls().is_empty());

        let requests = fx.provider.requests();
        assert_eq!(requests.len(), 1);
        let messages = &requests[0].messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.starts_with("PERSONA"));
        assert!(messages[0].content.contains("Weather data: Weather in London"));
        assert_eq!(messages[1], Message::user("weather in London"));

        assert_eq!(router.history().len(), 1);
        let turn = router.history().latest().unwrap();
        assert_eq!(turn.user(), "weather in London");
        assert_eq!(turn.assistant(), "generated reply");
    }

    #[tokio::test]
    async fn search_scenario_uses_stripped_query() {
        let fx = Fixture::ok();
        let mut router = fx.router();

        router.process("search rust programming").await;

        assert_eq!(fx.search.calls(), vec!["rust programming"]);
        assert!(fx.weather.calls().is_empty());
        let system = &fx.provider.requests()[0].messages[0].content;
        assert!(system.contains("Search results: Rust: a language"));
    }

    #[tokio::test]
    async fn zero_results_text_reaches_the_prompt() {
        let fx = Fixture::new(
            RecordingProvider::replying("nothing found, sorry"),
            RecordingContext::returning("search", "No search results found."),
            RecordingContext::returning("weather", "unused"),
        );
        let mut router = fx.router();

        router.process("google xyzzy plugh").await;

        let system = &fx.provider.requests()[0].messages[0].content;
        assert!(system.contains("Context: Search results: No search results found."));
    }

    #[tokio::test]
    async fn chat_invokes_no_context_provider() {
        let fx = Fixture::ok();
        let mut router = fx.router();

        router.process("tell me a joke").await;
        router.process("").await;

        assert!(fx.search.calls().is_empty());
        assert!(fx.weather.calls().is_empty());
        let system = &fx.provider.requests()[0].messages[0].content;
        assert_eq!(system, "PERSONA");
        assert_eq!(router.history().len(), 2);
    }

    #[tokio::test]
    async fn failing_context_still_produces_reply_and_turn() {
        let fx = Fixture::new(
            RecordingProvider::replying("best effort answer"),
            RecordingContext::returning("search", "unused"),
            RecordingContext::failing(
                "weather",
                ContextError::UpstreamData("invalid weather response".into()),
            ),
        );
        let mut router = fx.router();

        let out = router.process("weather in Paris").await;
        assert!(!out.is_empty());
        assert_eq!(router.history().len(), 1);

        let system = &fx.provider.requests()[0].messages[0].content;
        assert!(system.contains("weather unavailable for Paris"));
    }

    #[tokio::test]
    async fn failing_completion_is_recorded_as_reply() {
        let fx = Fixture::new(
            RecordingProvider::failing(ProviderError::Timeout("10s elapsed".into())),
            RecordingContext::returning("search", "unused"),
            RecordingContext::returning("weather", "unused"),
        );
        let mut router = fx.router();

        let out = router.process("hello").await;
        assert!(out.starts_with("Sorry, AI processing error"));
        assert_eq!(router.history().latest().unwrap().assistant(), out);
    }

    #[tokio::test]
    async fn unconfigured_completer_still_records_turn() {
        let fx = Fixture::ok();
        let mut router = ConversationRouter::new(
            Completer::new(None, "m"),
            fx.search.clone(),
            fx.weather.clone(),
        );

        let out = router.process("weather in Oslo").await;
        assert_eq!(out, crate::completion::NOT_CONFIGURED);
        assert_eq!(fx.weather.calls(), vec!["Oslo"]);
        assert_eq!(router.history().len(), 1);
    }

    #[tokio::test]
    async fn history_is_bounded_and_fifo() {
        let fx = Fixture::ok();
        let mut router = fx.router().with_history(History::new(10));

        for i in 1..=11 {
            router.process(&format!("message {i}")).await;
            assert!(router.history().len() <= 10);
        }

        assert_eq!(router.history().len(), 10);
        assert_eq!(router.history().oldest().unwrap().user(), "message 2");
        assert!(router.history().iter().all(|t| t.user() != "message 1"));
    }

    #[tokio::test]
    async fn replay_window_limits_history_sent() {
        let fx = Fixture::ok();
        let mut router = fx.router().with_window(3);

        for i in 1..=6 {
            router.process(&format!("message {i}")).await;
        }

        let last = fx.provider.requests().pop().unwrap();
        // system + 3 turns * 2 + current input
        assert_eq!(last.messages.len(), 8);
        assert_eq!(last.messages[1], Message::user("message 3"));
        assert_eq!(last.messages[2], Message::assistant("generated reply"));
        assert_eq!(last.messages[7], Message::user("message 6"));
    }

    #[tokio::test]
    async fn window_larger_than_capacity_is_clamped() {
        let fx = Fixture::ok();
        let mut router = fx
            .router()
            .with_history(History::new(2))
            .with_window(50);

        for i in 1..=4 {
            router.process(&format!("m{i}")).await;
        }

        let last = fx.provider.requests().pop().unwrap();
        assert_eq!(last.messages.len(), 1 + 2 * 2 + 1);
    }

    #[tokio::test]
    async fn preloaded_history_is_replayed() {
        let fx = Fixture::ok();
        let mut history = History::new(10);
        history.push(Turn::new("my name is Ana", "Nice to meet you, Ana!"));
        let mut router = fx.router().with_history(history);

        router.process("what's my name?").await;

        let messages = &fx.provider.requests()[0].messages;
        assert_eq!(messages[1], Message::user("my name is Ana"));
        assert_eq!(messages[2], Message::assistant("Nice to meet you, Ana!"));
        assert_eq!(router.history().len(), 2);
    }

    #[tokio::test]
    async fn clear_history_forgets_turns() {
        let fx = Fixture::ok();
        let mut router = fx.router();
        router.process("hi").await;
        router.clear_history();
        assert!(router.history().is_empty());
    }

    #[tokio::test]
    async fn default_city_comes_from_classifier() {
        let fx = Fixture::ok();
        let mut router = fx.router().with_classifier(IntentClassifier::new("Mumbai"));
        router.process("how's the weather?").await;
        assert_eq!(fx.weather.calls(), vec!["Mumbai"]);
    }

    #[test]
    fn from_config_without_keys_builds() {
        let config = AppConfig::default();
        let router = ConversationRouter::from_config(&config);
        assert!(!router.completer().is_configured());
        assert_eq!(router.history().capacity(), 10);
        assert_eq!(router.classify("weather"), Intent::Weather { city: "Delhi".into() });
    }
}

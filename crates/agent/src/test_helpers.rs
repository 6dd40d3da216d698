//! Shared test doubles for router and completer tests.

use async_trait::async_trait;
use chatroute_core::context::ContextProvider;
use chatroute_core::error::{ContextError, ProviderError};
use chatroute_core::message::Message;
use chatroute_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::sync::Mutex;

/// A provider that records every request and answers with a fixed reply
/// (or a fixed error).
pub struct RecordingProvider {
    reply: Result<String, ProviderError>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl RecordingProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for RecordingProvider {
    fn name(&self) -> &str {
        "recording_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let text = self.reply.clone()?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}

/// A context provider that records parameters and returns a scripted result.
pub struct RecordingContext {
    name: &'static str,
    result: Result<String, ContextError>,
    calls: Mutex<Vec<String>>,
}

impl RecordingContext {
    pub fn returning(name: &'static str, text: &str) -> Self {
        Self {
            name,
            result: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: &'static str, error: ContextError) -> Self {
        Self {
            name,
            result: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContextProvider for RecordingContext {
    fn name(&self) -> &str {
        self.name
    }

    async fn lookup(&self, parameter: &str) -> Result<String, ContextError> {
        self.calls.lock().unwrap().push(parameter.to_string());
        self.result.clone()
    }

    fn fallback(&self, parameter: &str, error: &ContextError) -> String {
        format!("{} unavailable for {parameter}: {error}", self.name)
    }
}

//! Prompt assembly: system directive, replayed turns, current input.

use chatroute_core::message::{Message, Turn};
use crate::intent::Intent;

/// Label the raw provider output so the model knows where it came from.
///
/// Chat messages carry no context.
pub fn label_context(intent: &Intent, raw: &str) -> String {
    match intent {
        Intent::Weather { .. } => format!("Weather data: {raw}"),
        Intent::Search { .. } => format!("Search results: {raw}"),
        Intent::Chat => String::new(),
    }
}

/// The persona directive with the context interpolated into it.
pub fn directive(persona: &str, context: &str) -> String {
    if context.is_empty() {
        persona.to_string()
    } else {
        format!("{persona}\n\nContext: {context}")
    }
}

/// One system message, then user/assistant pairs oldest first, then the input.
pub fn assemble(directive: &str, history: &[Turn], input: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(Message::system(directive));
    for turn in history {
        messages.extend(turn.to_messages());
    }
    messages.push(Message::user(input));
    messages
}

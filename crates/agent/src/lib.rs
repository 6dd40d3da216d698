//! The conversation pipeline of chatroute.
//!
//! Each user message goes through the same steps:
//!
//! 1. **Classify** it as a weather question, a search request or plain chat
//! 2. **Fetch context** from the matching provider, if any
//! 3. **Assemble** the persona directive, recent turns and the message
//! 4. **Complete** via the configured provider
//! 5. **Record** the turn in a bounded history
//!
//! Failures anywhere along the way become reply text; a turn always
//! produces output.

pub mod completion;
pub mod history;
pub mod intent;
pub mod prompt;
pub mod router;

#[cfg(test)]
mod test_helpers;

pub use completion::{Completer, NOT_CONFIGURED};
pub use history::{History, HistoryError};
pub use intent::{Intent, IntentClassifier};
pub use router::ConversationRouter;

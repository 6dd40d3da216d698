//! # chatroute Core
//!
//! Domain types, traits, and error definitions for the chatroute assistant.
//! This crate has **no HTTP or runtime dependencies**: it defines the domain
//! model that the provider, context, and agent crates implement against.
//!
//! ## Layout
//!
//! - [`message`]: chat messages, roles, recorded turns, session ids
//! - [`provider`]: the completion [`Provider`] trait
//! - [`context`]: the [`ContextProvider`] trait for search/weather lookups
//! - [`error`]: the error taxonomy shared by all crates

pub mod context;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use context::ContextProvider;
pub use error::{ContextError, ProviderError};
pub use message::{Message, Role, SessionId, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};

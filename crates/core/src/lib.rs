//! # Reverie Core
//!
//! Domain types, collaborator traits, and error definitions for the Reverie
//! journal chat pipeline. This crate has **no framework dependencies**: it
//! defines the model every other crate implements against.
//!
//! ## Collaborators
//!
//! The chat pipeline talks to exactly two outside capabilities, both defined
//! as traits here and passed around explicitly as `Arc<dyn _>`:
//! - [`JournalIndex`]: search journal entries and fetch their text
//! - [`Provider`]: stream a chat completion from an LLM backend

pub mod error;
pub mod journal;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, RetrievalError};
pub use journal::{EntryRef, JournalEntry, JournalIndex, SearchHit};
pub use message::{Conversation, ConversationId, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage};

//! LLM Provider implementations for Reverie.
//!
//! All providers implement the `reverie_core::Provider` trait.
//! The router builds the configured provider.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_from_config};

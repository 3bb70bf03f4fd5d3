//! Error types for the Reverie domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator boundary has its own error enum.

use thiserror::Error;

/// The top-level error type for all Reverie operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion collaborator ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Retrieval collaborator ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Precondition violations ---
    #[error("Conversation is empty: {operation} needs at least one message")]
    EmptyConversation { operation: &'static str },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Fetching entry text failed: {0}")]
    FetchFailed(String),

    #[error("Unknown journal entry: {0}")]
    UnknownEntry(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

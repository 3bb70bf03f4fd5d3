//! Journal trait: the Retrieval Collaborator.
//!
//! A journal index ranks entries against a free-text query and turns entry
//! references back into text. References are opaque to the chat pipeline:
//! it only ever hands them back to the same index.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;

/// Opaque key identifying one journal entry (a thread root).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryRef(pub String);

impl EntryRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The entry that matched
    #[serde(rename = "ref")]
    pub entry_ref: EntryRef,

    /// Relevance score; higher ranks first
    pub score: f32,
}

/// A journal entry together with the replies threaded under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Lookup key for this entry
    pub entry_ref: EntryRef,

    /// Optional title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body text
    pub content: String,

    /// When the entry was written
    pub created_at: DateTime<Utc>,

    /// Replies in thread order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<String>,
}

impl JournalEntry {
    pub fn new(entry_ref: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            entry_ref: EntryRef::new(entry_ref),
            title: None,
            content: content.into(),
            created_at: Utc::now(),
            replies: Vec::new(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.replies.push(reply.into());
        self
    }

    /// The whole thread as one text block: the entry, then each reply,
    /// separated by blank lines.
    pub fn thread_text(&self) -> String {
        std::iter::once(self.content.trim())
            .chain(self.replies.iter().map(|r| r.trim()))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// The Retrieval Collaborator.
///
/// Implementations: in-memory (for testing and embedding), directory-backed.
#[async_trait]
pub trait JournalIndex: Send + Sync {
    /// The index name (e.g., "in_memory", "directory").
    fn name(&self) -> &str;

    /// Rank entries against `query`, best first, returning at most `limit` hits.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, RetrievalError>;

    /// Thread text for each reference, in the same order as `refs`.
    async fn fetch_texts(&self, refs: &[EntryRef]) -> Result<Vec<String>, RetrievalError>;

    /// Thread text of the `limit` most recent entries, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<String>, RetrievalError>;
}

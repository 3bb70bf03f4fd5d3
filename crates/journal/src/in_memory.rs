//! In-memory journal index: useful for testing and for indexes built elsewhere.

use async_trait::async_trait;
use reverie_core::error::RetrievalError;
use reverie_core::journal::{EntryRef, JournalEntry, JournalIndex, SearchHit};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::keyword::{keyword_score, query_terms};

/// A journal index that keeps every entry in a Vec.
#[derive(Clone)]
pub struct InMemoryIndex {
    entries: Arc<RwLock<Vec<JournalEntry>>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_entries(entries: Vec<JournalEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Add an entry, replacing any entry with the same reference.
    pub async fn insert(&self, entry: JournalEntry) -> EntryRef {
        let key = entry.entry_ref.clone();
        let mut entries = self.entries.write().await;
        entries.retain(|e| e.entry_ref != key);
        entries.push(entry);
        key
    }

    /// Remove an entry. Returns whether it existed.
    pub async fn remove(&self, entry_ref: &EntryRef) -> bool {
        let mut entries = self.entries.write().await;
        let len_before = entries.len();
        entries.retain(|e| &e.entry_ref != entry_ref);
        entries.len() < len_before
    }

    /// Swap the full entry set in one step.
    pub async fn replace_all(&self, entries: Vec<JournalEntry>) {
        *self.entries.write().await = entries;
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JournalIndex for InMemoryIndex {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        let terms = query_terms(query);
        let entries = self.entries.read().await;

        let mut hits: Vec<SearchHit> = entries
            .iter()
            .filter_map(|e| {
                let score = keyword_score(&terms, &e.thread_text());
                (score > 0.0).then(|| SearchHit {
                    entry_ref: e.entry_ref.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);

        debug!(terms = terms.len(), hits = hits.len(), limit, "Journal search");
        Ok(hits)
    }

    async fn fetch_texts(&self, refs: &[EntryRef]) -> Result<Vec<String>, RetrievalError> {
        let entries = self.entries.read().await;
        refs.iter()
            .map(|r| {
                entries
                    .iter()
                    .find(|e| &e.entry_ref == r)
                    .map(JournalEntry::thread_text)
                    .ok_or_else(|| RetrievalError::UnknownEntry(r.to_string()))
            })
            .collect()
    }

    async fn recent(&self, limit: usize) -> Result<Vec<String>, RetrievalError> {
        let entries = self.entries.read().await;
        let mut newest: Vec<&JournalEntry> = entries.iter().collect();
        newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(newest
            .into_iter()
            .take(limit)
            .map(JournalEntry::thread_text)
            .collect())
    }
}

//! Shared test helpers for chat pipeline tests.

use async_trait::async_trait;
use reverie_core::error::{ProviderError, RetrievalError};
use reverie_core::journal::{EntryRef, JournalIndex, SearchHit};
use reverie_core::message::Message;
use reverie_core::provider::{
    ChunkReceiver, Provider, ProviderRequest, ProviderResponse, StreamChunk,
};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// A journal index that returns fixed entries for every query.
///
/// Every search returns all entries in insertion order; recorded queries can
/// be inspected afterwards.
pub struct StubIndex {
    entries: Vec<(EntryRef, String)>,
    recent: Vec<String>,
    fail_search: bool,
    fail_fetch: bool,
    queries: Mutex<Vec<(String, usize)>>,
    recent_calls: Mutex<usize>,
}

impl StubIndex {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(r, text)| (EntryRef::new(*r), text.to_string()))
                .collect(),
            recent: Vec::new(),
            fail_search: false,
            fail_fetch: false,
            queries: Mutex::new(Vec::new()),
            recent_calls: Mutex::new(0),
        }
    }

    /// Create an index whose search always fails.
    pub fn failing() -> Self {
        Self {
            fail_search: true,
            ..Self::new(&[])
        }
    }

    /// Create an index whose search succeeds but whose text fetch fails.
    pub fn failing_fetch(entries: &[(&str, &str)]) -> Self {
        Self {
            fail_fetch: true,
            ..Self::new(entries)
        }
    }

    pub fn with_recent(mut self, recent: &[&str]) -> Self {
        self.recent = recent.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn recent_calls(&self) -> usize {
        *self.recent_calls.lock().unwrap()
    }
}

#[async_trait]
impl JournalIndex for StubIndex {
    fn name(&self) -> &str {
        "stub"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        self.queries.lock().unwrap().push((query.to_string(), limit));
        if self.fail_search {
            return Err(RetrievalError::SearchFailed("index offline".into()));
        }
        Ok(self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (r, _))| SearchHit {
                entry_ref: r.clone(),
                score: 1.0 - i as f32 * 0.1,
            })
            .take(limit)
            .collect())
    }

    async fn fetch_texts(&self, refs: &[EntryRef]) -> Result<Vec<String>, RetrievalError> {
        if self.fail_fetch {
            return Err(RetrievalError::FetchFailed("entry store unavailable".into()));
        }
        refs.iter()
            .map(|r| {
                self.entries
                    .iter()
                    .find(|(key, _)| key == r)
                    .map(|(_, text)| text.clone())
                    .ok_or_else(|| RetrievalError::UnknownEntry(r.to_string()))
            })
            .collect()
    }

    async fn recent(&self, limit: usize) -> Result<Vec<String>, RetrievalError> {
        *self.recent_calls.lock().unwrap() += 1;
        Ok(self.recent.iter().take(limit).cloned().collect())
    }
}

/// A provider that streams scripted chunks and records every request.
///
/// Each `Some(text)` becomes a delta chunk and each `None` a chunk without
/// content. An optional error is sent after the scripted chunks.
pub struct ScriptedStreamProvider {
    chunks: Vec<Option<String>>,
    trailing_error: Option<ProviderError>,
    open_error: Option<ProviderError>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedStreamProvider {
    pub fn new(chunks: &[Option<&str>]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.map(str::to_string)).collect(),
            trailing_error: None,
            open_error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script that streams plain text deltas.
    pub fn deltas(deltas: &[&str]) -> Self {
        Self::new(&deltas.iter().map(|d| Some(*d)).collect::<Vec<_>>())
    }

    /// Fail mid-stream after the scripted chunks.
    pub fn then_fail(mut self, err: ProviderError) -> Self {
        self.trailing_error = Some(err);
        self
    }

    /// Fail before any chunk is produced.
    pub fn failing_open(err: ProviderError) -> Self {
        Self {
            open_error: Some(err),
            ..Self::new(&[])
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedStreamProvider {
    fn name(&self) -> &str {
        "scripted_stream"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        let text: String = self.chunks.iter().flatten().map(String::as_str).collect();
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: None,
            model: request.model,
        })
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ChunkReceiver, ProviderError> {
        self.requests.lock().unwrap().push(request);
        if let Some(err) = &self.open_error {
            return Err(err.clone());
        }

        let (tx, rx) = mpsc::channel(self.chunks.len() + 1);
        for content in &self.chunks {
            let chunk = StreamChunk {
                content: content.clone(),
                ..StreamChunk::default()
            };
            tx.send(Ok(chunk)).await.unwrap();
        }
        if let Some(err) = &self.trailing_error {
            tx.send(Err(err.clone())).await.unwrap();
        }
        Ok(rx)
    }
}

//! Message augmentation: ground each user turn in the journal.
//!
//! For every utterance the augmenter searches the journal with the last
//! message of the conversation plus the utterance, fetches the bodies of
//! the hits, and appends them as a system message followed by the user
//! message itself.

use reverie_core::error::{Error, Result};
use reverie_core::journal::{EntryRef, JournalIndex};
use reverie_core::message::{Conversation, Message};
use std::sync::Arc;
use tracing::debug;

/// Prefix of the retrieval-grounded system message. Entry texts follow directly.
pub const RETRIEVAL_LABEL: &str =
    "Here are some relevant entries from the user's journal related to the user's message:";

/// Maximum number of journal hits requested per turn.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Build the search query for a turn from the last message and the new utterance.
pub fn retrieval_query(last_message: &str, utterance: &str) -> String {
    format!("{last_message} \n\n{utterance}")
}

/// Appends journal context and the user's utterance to a conversation.
#[derive(Clone)]
pub struct MessageAugmenter {
    /// Retrieval collaborator.
    index: Arc<dyn JournalIndex>,
    /// Result cap passed to every search.
    search_limit: usize,
}

impl MessageAugmenter {
    pub fn new(index: Arc<dyn JournalIndex>) -> Self {
        Self {
            index,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Override the number of hits requested per search.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }

    /// Return `conversation` extended with a retrieval system message and the
    /// user message. The input conversation is left unchanged.
    ///
    /// Fails with [`Error::EmptyConversation`] when there is no last message
    /// to build the query from. Search and fetch failures are returned as-is.
    pub async fn augment(&self, conversation: &Conversation, utterance: &str) -> Result<Conversation> {
        let last = conversation
            .last()
            .ok_or(Error::EmptyConversation { operation: "augment" })?;

        // ── Step 1: Search ──
        let query = retrieval_query(&last.content, utterance);
        let hits = self.index.search(&query, self.search_limit).await?;

        // ── Step 2: Fetch bodies, in ranking order ──
        let refs: Vec<EntryRef> = hits.into_iter().map(|h| h.entry_ref).collect();
        let texts = self.index.fetch_texts(&refs).await?;

        debug!(
            index = self.index.name(),
            query_len = query.len(),
            hits = refs.len(),
            "Augmented user message with journal context"
        );

        // ── Step 3: Append context then utterance ──
        let context = format!("{RETRIEVAL_LABEL}{}", texts.join("\n"));
        Ok(conversation.appended([Message::system(context), Message::user(utterance)]))
    }
}

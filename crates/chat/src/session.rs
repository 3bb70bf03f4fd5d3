//! Chat session: the seed cache, the visible conversation, and the
//! collaborators that extend it.

use reverie_config::AppConfig;
use reverie_core::error::Result;
use reverie_core::journal::JournalIndex;
use reverie_core::message::{Conversation, ConversationId, Message};
use reverie_core::provider::Provider;
use std::sync::Arc;
use tracing::{debug, info};

use crate::augment::{DEFAULT_SEARCH_LIMIT, MessageAugmenter};
use crate::dispatch::{DEFAULT_MAX_TOKENS, StreamingDispatcher};
use crate::seed::{SeedCache, render_recent_entries};

/// Tunables for a chat session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Personality description embedded in the seed.
    pub persona: String,
    /// Model identifier for completions.
    pub model: String,
    /// Output length cap per reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Journal hits requested per turn.
    pub search_limit: usize,
    /// Recent entries embedded in the seed.
    pub recent_limit: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            persona: String::new(),
            model: "gpt-4o-mini".into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.7,
            search_limit: DEFAULT_SEARCH_LIMIT,
            recent_limit: 10,
        }
    }
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            persona: config.persona.clone(),
            model: config.default_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            search_limit: config.journal.search_limit,
            recent_limit: config.journal.recent_limit,
        }
    }
}

/// One conversation with the journal.
///
/// The visible conversation starts as the seed, is replaced on every
/// dispatch, and goes back to the seed on [`reset`](Self::reset).
pub struct ChatSession {
    id: ConversationId,
    index: Arc<dyn JournalIndex>,
    augmenter: MessageAugmenter,
    dispatcher: StreamingDispatcher,
    persona: String,
    recent_limit: usize,
    seed: SeedCache,
    conversation: Conversation,
}

impl ChatSession {
    /// Fetch the latest entries, build the seed, and start on it.
    pub async fn start(
        index: Arc<dyn JournalIndex>,
        provider: Arc<dyn Provider>,
        settings: SessionSettings,
    ) -> Result<Self> {
        let augmenter =
            MessageAugmenter::new(index.clone()).with_search_limit(settings.search_limit);
        let dispatcher = StreamingDispatcher::new(provider, settings.model)
            .with_max_tokens(settings.max_tokens)
            .with_temperature(settings.temperature);

        let mut session = Self {
            id: ConversationId::new(),
            index,
            augmenter,
            dispatcher,
            persona: settings.persona,
            recent_limit: settings.recent_limit,
            seed: SeedCache::new(),
            conversation: Conversation::new(),
        };
        session.rebuild_seed().await?;
        session.conversation = session.seed.seed().clone();

        info!(
            session = %session.id,
            model = session.dispatcher.model(),
            index = session.index.name(),
            "Chat session started"
        );
        Ok(session)
    }

    async fn rebuild_seed(&mut self) -> Result<()> {
        let recent = self.index.recent(self.recent_limit).await?;
        debug!(session = %self.id, recent = recent.len(), "Fetched recent entries for seed");
        let text = render_recent_entries(&recent);
        self.seed.get_or_build(&self.persona, || text);
        Ok(())
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// The conversation as the caller currently sees it.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn seed(&self) -> &Conversation {
        self.seed.seed()
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Drop everything after the seed and return the fresh conversation.
    pub fn reset(&mut self) -> Conversation {
        debug!(session = %self.id, dropped = self.conversation.len(), "Conversation reset");
        self.conversation = self.seed.seed().clone();
        self.conversation.clone()
    }

    /// Change the persona. The seed is rebuilt (with freshly fetched recent
    /// entries) only when the description differs; the running conversation
    /// keeps its old seed until the next [`reset`](Self::reset).
    ///
    /// Returns whether the seed was rebuilt.
    pub async fn set_persona(&mut self, persona: impl Into<String>) -> Result<bool> {
        let persona = persona.into();
        if self.seed.is_current(&persona) {
            return Ok(false);
        }
        self.persona = persona;
        self.rebuild_seed().await?;
        Ok(true)
    }

    /// Ground `utterance` in the journal and return the extended conversation.
    /// The visible conversation is not changed.
    pub async fn augment(&self, utterance: &str) -> Result<Conversation> {
        self.augmenter.augment(&self.conversation, utterance).await
    }

    /// Make `conversation` visible, then stream a reply to it.
    pub async fn dispatch<F>(&mut self, conversation: Conversation, on_token: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        self.conversation = conversation;
        self.dispatcher.dispatch(&self.conversation, on_token).await
    }

    /// Run one full turn: augment, dispatch, and record the reply.
    ///
    /// On success the reply is appended to the visible conversation as an
    /// assistant message and returned. On failure the visible conversation
    /// keeps whatever the failing step left it with.
    pub async fn send<F>(&mut self, utterance: &str, mut on_token: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let augmented = self.augment(utterance).await?;

        let mut reply = String::new();
        self.dispatch(augmented, |token| {
            reply.push_str(token);
            on_token(token);
        })
        .await?;

        self.conversation = self.conversation.appended([Message::assistant(reply.clone())]);
        debug!(
            session = %self.id,
            reply_len = reply.len(),
            messages = self.conversation.len(),
            "Turn complete"
        );
        Ok(reply)
    }
}

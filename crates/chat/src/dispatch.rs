//! Streaming dispatch: send a conversation to the model and hand back its
//! reply one delta at a time.

use futures::{Stream, StreamExt};
use reverie_core::error::{Error, Result};
use reverie_core::message::Conversation;
use reverie_core::provider::{Provider, ProviderRequest};
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

/// Output length cap for every completion.
pub const DEFAULT_MAX_TOKENS: u32 = 400;

/// Pull-based stream of text deltas, in provider arrival order.
///
/// Yields one item per provider chunk (`""` for chunks without text).
/// Dropping the stream abandons the completion.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Opens streaming completions for a conversation.
#[derive(Clone)]
pub struct StreamingDispatcher {
    /// Completion collaborator.
    provider: Arc<dyn Provider>,
    /// Model identifier sent with every request.
    model: String,
    /// Output length cap.
    max_tokens: u32,
    /// Sampling temperature.
    temperature: f32,
}

impl StreamingDispatcher {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.7,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, conversation: &Conversation) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: conversation.messages().to_vec(),
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
            stream: true,
        }
    }

    /// Open a streaming completion and return its deltas as a [`TokenStream`].
    pub async fn open(&self, conversation: &Conversation) -> Result<TokenStream> {
        if conversation.is_empty() {
            return Err(Error::EmptyConversation { operation: "dispatch" });
        }

        info!(
            provider = self.provider.name(),
            model = %self.model,
            messages = conversation.len(),
            max_tokens = self.max_tokens,
            "Opening streaming completion"
        );

        let rx = self.provider.stream(self.request(conversation)).await?;
        let tokens = ReceiverStream::new(rx).map(|chunk| {
            chunk
                .map(|c| c.text().to_string())
                .map_err(Error::from)
        });
        Ok(Box::pin(tokens))
    }

    /// Stream a completion, calling `on_token` once per chunk in arrival order.
    ///
    /// Returns when the stream ends. The reply is not aggregated; callers
    /// that need the full text collect it in the callback. A stream error
    /// ends dispatch with that error after any tokens already delivered.
    pub async fn dispatch<F>(&self, conversation: &Conversation, mut on_token: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        let mut tokens = self.open(conversation).await?;
        let mut chunks = 0usize;

        while let Some(token) = tokens.next().await {
            let token = token?;
            on_token(&token);
            chunks += 1;
        }

        debug!(chunks, model = %self.model, "Streaming completion finished");
        Ok(())
    }
}

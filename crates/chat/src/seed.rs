//! Seed conversation: the fixed block of system messages every chat starts with.

use chrono::{DateTime, TimeZone};
use reverie_core::message::{Conversation, Message};
use tracing::debug;

/// Number of system messages in a seed conversation.
pub const SEED_LEN: usize = 5;

const APP_INTRO: &str = "You are a helpful assistant within a digital journaling app called Pile.";

const PERSONA_PREFIX: &str = "The user has provided a description of your personality:";

const INSTRUCTIONS: &str = "You are about to start a conversation with the user, usually involving \
reflection or discussion about their thoughts in this journal. For each of their messages, the \
system will provide a list of relevant journal entries as context to you, be aware of it when you \
answer and use whatever is relevant and appropriate. You are a wise librarian of my thoughts, \
providing advice and counsel. You try to keep responses concise and get to the point quickly. \
Plain-text responses only. You address the user as 'you', you don't need to know their name. You \
should engage with the user like you're a human. When you mention time, always do it relative to \
the current time– \nthe date and time at this moment is: ";

const RECENT_PREFIX: &str = "Here are the 10 latest journal entries from the user: \n\n";

const HANDOFF: &str = "The user starts the conversation:";

/// Build the seed conversation.
///
/// `now` is rendered into the instructions, so the seed records the moment
/// it was built rather than the moment it is sent.
pub fn build_seed_conversation<Tz>(
    persona: &str,
    recent_entries_text: &str,
    now: &DateTime<Tz>,
) -> Conversation
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    Conversation::from_messages(vec![
        Message::system(APP_INTRO),
        Message::system(format!("{PERSONA_PREFIX}{persona}")),
        Message::system(format!("{INSTRUCTIONS}{}.", format_timestamp(now))),
        Message::system(format!("{RECENT_PREFIX}{recent_entries_text}")),
        Message::system(HANDOFF),
    ])
}

/// Join recent entry texts into the block embedded in the seed.
pub fn render_recent_entries(texts: &[String]) -> String {
    texts.join("\n\n")
}

/// e.g. `Sat Mar 02 2024 08:15:00 GMT+0100`
fn format_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}

/// Seed memoized on the persona description.
#[derive(Debug, Default)]
pub struct SeedCache {
    persona: Option<String>,
    seed: Conversation,
}

impl SeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cached seed was built for `persona`.
    pub fn is_current(&self, persona: &str) -> bool {
        self.persona.as_deref() == Some(persona)
    }

    /// The cached seed. Empty until the first build.
    pub fn seed(&self) -> &Conversation {
        &self.seed
    }

    /// Return the seed for `persona`, building it only when the persona differs
    /// from the cached one. `recent_entries_text` is only called on a rebuild.
    pub fn get_or_build(
        &mut self,
        persona: &str,
        recent_entries_text: impl FnOnce() -> String,
    ) -> &Conversation {
        if !self.is_current(persona) {
            debug!(persona_len = persona.len(), "Rebuilding seed conversation");
            self.seed = build_seed_conversation(
                persona,
                &recent_entries_text(),
                &chrono::Local::now(),
            );
            self.persona = Some(persona.to_string());
        }
        &self.seed
    }
}

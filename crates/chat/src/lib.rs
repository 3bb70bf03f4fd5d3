//! The journal chat pipeline.
//!
//! Each user turn runs the same linear flow:
//!
//! 1. **Seed**: five system messages (persona, instructions, current time,
//!    the latest journal entries), rebuilt only when the persona changes
//! 2. **Augment**: search the journal with the last message plus the new
//!    utterance, and append the retrieved entries and the utterance
//! 3. **Dispatch**: stream a completion for the augmented conversation,
//!    handing every delta to the caller in arrival order
//!
//! Nothing in the pipeline retries or substitutes content: retrieval and
//! provider failures are returned to the caller as they happened.

pub mod augment;
pub mod dispatch;
pub mod seed;
pub mod session;

pub use augment::{MessageAugmenter, RETRIEVAL_LABEL, retrieval_query};
pub use dispatch::{StreamingDispatcher, TokenStream};
pub use seed::{SEED_LEN, SeedCache, build_seed_conversation, render_recent_entries};
pub use session::{ChatSession, SessionSettings};

#[cfg(test)]
pub(crate) mod test_helpers;

//! Journal index implementations for Reverie.
//!
//! Both indexes rank entries with the same keyword scorer; they differ only
//! in where entries come from.

pub mod directory;
pub mod in_memory;
pub mod keyword;

pub use directory::DirectoryIndex;
pub use in_memory::InMemoryIndex;
pub use keyword::{keyword_score, query_terms};

//! Keyword relevance scoring.
//!
//! Queries built by the chat pipeline are long (the previous system message
//! plus the user's utterance), so matching the query as one substring would
//! almost never hit. Instead the query is split into terms and each entry is
//! scored by how often those terms occur, normalized by entry length.

use std::collections::BTreeSet;

/// Terms shorter than this are ignored.
const MIN_TERM_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "your", "all", "any", "can", "had", "her",
    "was", "one", "our", "out", "has", "him", "his", "how", "its", "who", "did", "yes", "get",
    "this", "that", "with", "have", "from", "they", "will", "would", "there", "their", "what",
    "about", "which", "when", "were", "been", "into", "than", "then", "them", "these", "some",
    "here", "just", "like", "user", "users",
];

/// Split `query` into distinct lowercase search terms.
pub fn query_terms(query: &str) -> Vec<String> {
    let terms: BTreeSet<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_TERM_LEN)
        .map(|w| w.to_lowercase())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect();
    terms.into_iter().collect()
}

/// Score `text` against pre-split `terms`. Zero means no term occurs.
pub fn keyword_score(terms: &[String], text: &str) -> f32 {
    if terms.is_empty() || text.is_empty() {
        return 0.0;
    }

    let lower = text.to_lowercase();
    let mut occurrences = 0usize;
    let mut distinct = 0usize;

    for term in terms {
        let n = lower.matches(term.as_str()).count();
        if n > 0 {
            distinct += 1;
            occurrences += n;
        }
    }

    if distinct == 0 {
        return 0.0;
    }

    // Distinct terms dominate; density only breaks ties and stays below 1
    let density = occurrences as f32 / (lower.len() as f32 / 100.0).max(1.0);
    distinct as f32 + density / (1.0 + density)
}

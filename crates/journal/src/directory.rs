//! Directory-backed journal index.
//!
//! Reads a journal directory of posts (by default `*.md`), each optionally
//! starting with a YAML front-matter block:
//!
//! ```text
//! ---
//! title: Morning walk
//! createdAt: 2024-03-02T08:15:00Z
//! replies:
//!   - 2024/03/reply-1.md
//! ---
//! <p>Saw the first crocus.</p>
//! ```
//!
//! Posts named in another post's `replies` (or marked `isReply: true`) are
//! folded into their parent thread instead of being indexed on their own.
//! Entry references are paths relative to the journal root, `/`-separated.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ignore::WalkBuilder;
use reverie_core::error::RetrievalError;
use reverie_core::journal::{EntryRef, JournalEntry, JournalIndex, SearchHit};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::in_memory::InMemoryIndex;

/// A journal index loaded from a directory tree.
///
/// Entries are loaded on [`open`](Self::open) and again on
/// [`reload`](Self::reload); queries never touch the filesystem.
pub struct DirectoryIndex {
    root: PathBuf,
    extensions: Vec<String>,
    inner: InMemoryIndex,
}

impl DirectoryIndex {
    /// Load every post under `root`.
    pub async fn open(
        root: impl Into<PathBuf>,
        extensions: Vec<String>,
    ) -> Result<Self, RetrievalError> {
        let index = Self {
            root: root.into(),
            extensions,
            inner: InMemoryIndex::new(),
        };
        index.reload().await?;
        Ok(index)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Re-scan the directory, replacing the loaded entries. Returns the thread count.
    pub async fn reload(&self) -> Result<usize, RetrievalError> {
        let root = self.root.clone();
        let extensions = self.extensions.clone();

        let entries = tokio::task::spawn_blocking(move || load_threads(&root, &extensions))
            .await
            .map_err(|e| RetrievalError::Storage(format!("Journal loader panicked: {e}")))??;

        let count = entries.len();
        self.inner.replace_all(entries).await;
        info!(root = %self.root.display(), threads = count, "Journal loaded");
        Ok(count)
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }
}

#[async_trait]
impl JournalIndex for DirectoryIndex {
    fn name(&self) -> &str {
        "directory"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        self.inner.search(query, limit).await
    }

    async fn fetch_texts(&self, refs: &[EntryRef]) -> Result<Vec<String>, RetrievalError> {
        self.inner.fetch_texts(refs).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<String>, RetrievalError> {
        self.inner.recent(limit).await
    }
}

// ── Loading ───────────────────────────────────────────────────────────────

/// Front-matter keys we understand. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostFrontMatter {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    replies: Vec<String>,
    #[serde(default)]
    is_reply: bool,
}

#[derive(Debug)]
struct Post {
    front: PostFrontMatter,
    body: String,
    created_at: DateTime<Utc>,
}

fn load_threads(root: &Path, extensions: &[String]) -> Result<Vec<JournalEntry>, RetrievalError> {
    if !root.is_dir() {
        return Err(RetrievalError::Storage(format!(
            "Journal directory not found: {}",
            root.display()
        )));
    }

    let files = collect_posts(root, extensions);

    let mut posts: BTreeMap<String, Post> = BTreeMap::new();
    for path in files {
        let key = relative_key(root, &path);
        match read_post(&path) {
            Ok(post) => {
                posts.insert(key, post);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable post"),
        }
    }

    let reply_keys: HashSet<String> = posts
        .values()
        .flat_map(|p| p.front.replies.iter().map(|r| normalize_key(r)))
        .collect();

    let mut threads = Vec::new();
    for (key, post) in &posts {
        if post.front.is_reply || reply_keys.contains(key) {
            continue;
        }

        let mut entry = JournalEntry::new(key.clone(), post.body.clone())
            .with_created_at(post.created_at);
        entry.title = post.front.title.clone();

        for reply in &post.front.replies {
            match posts.get(&normalize_key(reply)) {
                Some(reply_post) => entry.replies.push(reply_post.body.clone()),
                None => warn!(post = %key, reply = %reply, "Reply not found in journal"),
            }
        }

        threads.push(entry);
    }

    debug!(posts = posts.len(), threads = threads.len(), "Journal threads assembled");
    Ok(threads)
}

/// Every post file under `root`. Hidden entries are skipped and symlinked
/// directories are not descended into.
fn collect_posts(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .build();

    let mut out = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable journal path");
                continue;
            }
        };
        let path = entry.path();
        let is_post = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if is_post {
            out.push(path.to_path_buf());
        }
    }
    out
}

fn read_post(path: &Path) -> Result<Post, std::io::Error> {
    let raw = std::fs::read_to_string(path)?;
    let (yaml, body) = split_front_matter(&raw);

    let front = match yaml {
        Some(y) if !y.trim().is_empty() => serde_yaml::from_str(y).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Ignoring malformed front matter");
            PostFrontMatter::default()
        }),
        _ => PostFrontMatter::default(),
    };

    let created_at = match front.created_at {
        Some(t) => t,
        None => std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now()),
    };

    Ok(Post {
        body: strip_markup(body),
        front,
        created_at,
    })
}

/// Split a leading `---` delimited block from the body.
fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw.strip_prefix("---") else {
        return (None, raw);
    };
    let Some(rest) = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
    else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, raw)
}

/// Drop HTML tags left by rich-text editors, keeping paragraph breaks.
fn strip_markup(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for c in body.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag.trim_start_matches('/').to_ascii_lowercase();
                if name.starts_with("br") || (tag.starts_with('/') && name.starts_with('p')) {
                    out.push('\n');
                }
            }
            _ if in_tag => tag.push(c),
            _ => out.push(c),
        }
    }

    out.trim().to_string()
}

fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_key(&rel.to_string_lossy())
}

fn normalize_key(key: &str) -> String {
    key.replace('\\', "/").trim_start_matches("./").to_string()
}

//! Canonical type definitions for the core domain
//!
//! Bookmarks, article bodies and sentences as seen by the navigation and
//! speak-mode code. None of these are owned by the core: they are snapshots of
//! whatever the store returned on the latest fetch.

use serde::{Deserialize, Serialize};

/// Opaque handle identifying a bookmark in the remote store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(String);

impl BookmarkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One item of the reading list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkSummary {
    pub id: BookmarkId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub starred: bool,
}

/// Full text of one bookmark, fetched on demand and never cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBody {
    pub raw_text: String,
}

impl ArticleBody {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

/// A single sentence of an article
///
/// `start` and `end` are byte offsets into the article's raw text. `text` is
/// `raw_text[start..end]` with trailing whitespace removed; leading whitespace
/// is never part of the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Summary of the currently selected bookmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkInfo {
    pub title: String,
    pub url: String,
    /// 0-based position in the latest fetch
    pub index: usize,
    pub total: usize,
}

impl BookmarkInfo {
    /// 1-based position shown to the user
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }
}

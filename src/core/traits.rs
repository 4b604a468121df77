//! Core traits for the domain layer
//!
//! These traits define the collaborators the reader depends on, so the remote
//! store and the sentence-boundary model can be swapped out and tests can use
//! in-memory implementations.

use super::errors::RemoteError;
use super::types::{ArticleBody, BookmarkId, BookmarkSummary};

/// Persists highlights for a bookmark
///
/// Kept separate from [`ReadingList`] because speak mode only needs this one
/// call. Failures are reported, never retried.
pub trait HighlightGateway {
    fn create_highlight(&self, bookmark: &BookmarkId, text: &str) -> Result<(), RemoteError>;
}

/// The remote reading list
///
/// Ordering of `fetch_bookmarks` is only guaranteed to be stable between calls
/// with the same limit inside one process run.
pub trait ReadingList: HighlightGateway {
    /// Short name used in logs and `--provider`
    fn name(&self) -> &str;

    fn fetch_bookmarks(&self, limit: usize) -> Result<Vec<BookmarkSummary>, RemoteError>;

    fn fetch_body(&self, bookmark: &BookmarkId) -> Result<ArticleBody, RemoteError>;

    fn delete_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError>;

    fn star_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError>;

    fn archive_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError>;

    fn add_bookmark(&self, url: &str) -> Result<(), RemoteError>;
}

impl<T: HighlightGateway + ?Sized> HighlightGateway for Box<T> {
    fn create_highlight(&self, bookmark: &BookmarkId, text: &str) -> Result<(), RemoteError> {
        (**self).create_highlight(bookmark, text)
    }
}

impl<T: ReadingList + ?Sized> ReadingList for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_bookmarks(&self, limit: usize) -> Result<Vec<BookmarkSummary>, RemoteError> {
        (**self).fetch_bookmarks(limit)
    }

    fn fetch_body(&self, bookmark: &BookmarkId) -> Result<ArticleBody, RemoteError> {
        (**self).fetch_body(bookmark)
    }

    fn delete_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError> {
        (**self).delete_bookmark(bookmark)
    }

    fn star_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError> {
        (**self).star_bookmark(bookmark)
    }

    fn archive_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError> {
        (**self).archive_bookmark(bookmark)
    }

    fn add_bookmark(&self, url: &str) -> Result<(), RemoteError> {
        (**self).add_bookmark(url)
    }
}

/// Sentence-boundary model
///
/// Returns candidate spans as `(byte offset, span)` pairs covering the input in
/// order. Spans may carry leading or trailing whitespace; the segmenter trims it.
pub trait BoundaryModel {
    fn spans<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)>;
}

//! Bookmark Session - cursor over the remote reading list
//!
//! Handles:
//! - Bounded navigation (next/prev/first/last/jump by ordinal)
//! - Reads of the selected bookmark (title, info, body, sentences)
//! - Destructive operations on the selected bookmark (delete/star/archive)
//!
//! The collection is never cached. Every call re-fetches it and evaluates the
//! cursor against what the store returns right now, so an index left behind by
//! a delete or archive is simply reported as out of range on the next read.

use super::errors::{Operation, ReaderError, RemoteError};
use super::segmenter::SentenceSegmenter;
use super::traits::ReadingList;
use super::types::{ArticleBody, BookmarkId, BookmarkInfo, BookmarkSummary, Sentence};

pub const DEFAULT_BOOKMARK_LIMIT: usize = 25;

/// Owns the cursor into the reading list
pub struct BookmarkSession<R> {
    store: R,
    /// Maximum number of bookmarks requested per fetch
    limit: usize,
    /// 0-based cursor; only meaningful while it is below the current count
    index: usize,
    segmenter: SentenceSegmenter,
}

impl<R: ReadingList> BookmarkSession<R> {
    pub fn new(store: R) -> Self {
        Self::with_limit(store, DEFAULT_BOOKMARK_LIMIT)
    }

    pub fn with_limit(store: R, limit: usize) -> Self {
        Self {
            store,
            limit,
            index: 0,
            segmenter: SentenceSegmenter::new(),
        }
    }

    /// The store this session reads from
    pub fn store(&self) -> &R {
        &self.store
    }

    /// Current 0-based cursor, whether or not it is still in range
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Fetch the collection; a failed fetch reads as an empty one
    fn bookmarks(&self) -> Vec<BookmarkSummary> {
        match self.store.fetch_bookmarks(self.limit) {
            Ok(marks) => marks,
            Err(err) => {
                tracing::warn!(store = self.store.name(), "Failed to fetch bookmarks: {}", err);
                Vec::new()
            }
        }
    }

    /// Fetch the collection, failing when it is unavailable or empty
    fn require_bookmarks(&self) -> Result<Vec<BookmarkSummary>, ReaderError> {
        let marks = self.bookmarks();
        if marks.is_empty() {
            return Err(ReaderError::CollectionUnavailable);
        }
        Ok(marks)
    }

    /// Bookmark under the cursor in a fresh fetch
    fn current(&self) -> Result<(BookmarkSummary, usize), ReaderError> {
        let mut marks = self.require_bookmarks()?;
        let count = marks.len();
        if self.index >= count {
            return Err(ReaderError::IndexOutOfRange {
                ordinal: self.index as i64 + 1,
                count,
            });
        }
        Ok((marks.swap_remove(self.index), count))
    }

    // ---- navigation -------------------------------------------------------

    /// Move to the next bookmark; false when already at the last one
    pub fn next(&mut self) -> bool {
        let count = self.count();
        if count > 0 && self.index < count - 1 {
            self.index += 1;
            tracing::debug!(index = self.index, count, "Moved to next bookmark");
            return true;
        }
        false
    }

    /// Move to the previous bookmark; false when already at the first one
    ///
    /// A cursor stranded past the end by a shrinking collection lands on the
    /// last bookmark.
    pub fn prev(&mut self) -> bool {
        let count = self.count();
        if count > 0 && self.index > 0 {
            self.index = (self.index - 1).min(count - 1);
            tracing::debug!(index = self.index, count, "Moved to previous bookmark");
            return true;
        }
        false
    }

    pub fn first(&mut self) -> bool {
        if self.count() > 0 {
            self.index = 0;
            return true;
        }
        false
    }

    pub fn last(&mut self) -> bool {
        let count = self.count();
        if count > 0 {
            self.index = count - 1;
            return true;
        }
        false
    }

    /// Jump to a 1-based ordinal; leaves the cursor alone when out of range
    pub fn set_by_ordinal(&mut self, ordinal: i64) -> bool {
        let count = self.count();
        match ordinal_to_index(ordinal, count) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    /// Whether the cursor points at an existing bookmark
    pub fn is_valid(&self) -> bool {
        self.index < self.count()
    }

    /// Size of the collection as of a fresh fetch (0 when unavailable)
    pub fn count(&self) -> usize {
        self.bookmarks().len()
    }

    // ---- reads ------------------------------------------------------------

    /// Titles of every bookmark, in store order
    pub fn titles(&self) -> Vec<String> {
        self.bookmarks().into_iter().map(|m| m.title).collect()
    }

    /// The selected bookmark as of one fresh fetch
    pub fn current_bookmark(&self) -> Result<BookmarkSummary, ReaderError> {
        self.current().map(|(mark, _)| mark)
    }

    pub fn current_title(&self) -> Result<String, ReaderError> {
        self.current_bookmark().map(|mark| mark.title)
    }

    pub fn current_info(&self) -> Result<BookmarkInfo, ReaderError> {
        let (mark, total) = self.current()?;
        Ok(BookmarkInfo {
            title: mark.title,
            url: mark.url,
            index: self.index,
            total,
        })
    }

    pub fn current_article(&self) -> Result<ArticleBody, ReaderError> {
        let mark = self.current_bookmark()?;
        self.article_for(&mark.id)
    }

    /// Body of the bookmark at a 1-based ordinal, without moving the cursor
    pub fn article_by_ordinal(&self, ordinal: i64) -> Result<ArticleBody, ReaderError> {
        let marks = self.require_bookmarks()?;
        let count = marks.len();
        let index =
            ordinal_to_index(ordinal, count).ok_or(ReaderError::IndexOutOfRange { ordinal, count })?;
        self.article_for(&marks[index].id)
    }

    /// Body of one bookmark, without fetching the list
    pub fn article_for(&self, id: &BookmarkId) -> Result<ArticleBody, ReaderError> {
        self.store
            .fetch_body(id)
            .map_err(|e| ReaderError::remote(Operation::FetchBody, e))
    }

    /// Segment the selected article into sentences
    pub fn current_sentences(&self) -> Result<Vec<Sentence>, ReaderError> {
        let mark = self.current_bookmark()?;
        self.sentences_for(&mark.id)
    }

    /// Segment one bookmark's article; blank or unsegmentable text is `NoContent`
    pub fn sentences_for(&self, id: &BookmarkId) -> Result<Vec<Sentence>, ReaderError> {
        let body = self.article_for(id)?;
        if body.is_blank() {
            return Err(ReaderError::NoContent);
        }
        let sentences = self.segmenter.segment(&body.raw_text);
        if sentences.is_empty() {
            return Err(ReaderError::NoContent);
        }
        Ok(sentences)
    }

    // ---- mutations --------------------------------------------------------

    /// Delete the selected bookmark, returning its title
    pub fn delete_current(&self) -> Result<String, ReaderError> {
        self.apply_to_current(Operation::Delete, |store, id| store.delete_bookmark(id))
    }

    /// Star the selected bookmark, returning its title
    pub fn star_current(&self) -> Result<String, ReaderError> {
        self.apply_to_current(Operation::Star, |store, id| store.star_bookmark(id))
    }

    /// Archive the selected bookmark, returning its title
    pub fn archive_current(&self) -> Result<String, ReaderError> {
        self.apply_to_current(Operation::Archive, |store, id| store.archive_bookmark(id))
    }

    /// Highlight text in the selected bookmark, returning its title
    pub fn create_highlight_for_current(&self, text: &str) -> Result<String, ReaderError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReaderError::InvalidInput(
                "No text provided for highlight".to_string(),
            ));
        }
        self.apply_to_current(Operation::Highlight, |store, id| {
            store.create_highlight(id, text)
        })
    }

    /// Save a new URL to the reading list, returning the trimmed URL
    pub fn add_url(&self, url: &str) -> Result<String, ReaderError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ReaderError::InvalidInput("No URL provided".to_string()));
        }
        self.store
            .add_bookmark(url)
            .map_err(|e| ReaderError::remote(Operation::Add, e))?;
        tracing::info!(url, "Added bookmark");
        Ok(url.to_string())
    }

    fn apply_to_current<F>(&self, operation: Operation, call: F) -> Result<String, ReaderError>
    where
        F: FnOnce(&R, &BookmarkId) -> Result<(), RemoteError>,
    {
        let (mark, _) = self.current()?;
        call(&self.store, &mark.id).map_err(|e| ReaderError::remote(operation, e))?;
        tracing::info!(%operation, bookmark = %mark.id, "Applied operation to bookmark");
        Ok(mark.title)
    }
}

/// Convert a 1-based ordinal to an index, if it falls inside `count`
fn ordinal_to_index(ordinal: i64, count: usize) -> Option<usize> {
    let index = usize::try_from(ordinal.checked_sub(1)?).ok()?;
    (index < count).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SimStore;
    use proptest::prelude::*;

    fn session_with(count: usize) -> BookmarkSession<SimStore> {
        BookmarkSession::new(SimStore::with_articles(count))
    }

    #[test]
    fn test_next_stops_at_last() {
        let mut session = session_with(3);
        assert!(session.next());
        assert!(session.next());
        assert!(!session.next());
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_prev_stops_at_first() {
        let mut session = session_with(3);
        assert!(!session.prev());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_first_and_last() {
        let mut session = session_with(4);
        assert!(session.last());
        assert_eq!(session.current_index(), 3);
        assert!(session.first());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_empty_collection_is_unavailable() {
        let mut session = session_with(0);
        assert!(!session.next());
        assert!(!session.prev());
        assert!(!session.first());
        assert!(!session.last());
        assert!(!session.set_by_ordinal(1));
        assert!(!session.is_valid());
        assert_eq!(session.count(), 0);
        assert!(matches!(
            session.current_title(),
            Err(ReaderError::CollectionUnavailable)
        ));
    }

    #[test]
    fn test_fetch_failure_behaves_as_empty() {
        let store = SimStore::with_articles(3);
        store.fail_fetches(true);
        let mut session = BookmarkSession::new(store);
        assert!(!session.next());
        assert!(!session.last());
        assert!(!session.is_valid());
        assert!(session.titles().is_empty());
        assert!(matches!(
            session.current_info(),
            Err(ReaderError::CollectionUnavailable)
        ));
    }

    #[test]
    fn test_set_by_ordinal_bounds() {
        let mut session = session_with(5);
        assert!(session.set_by_ordinal(3));
        assert_eq!(session.current_index(), 2);
        assert!(!session.set_by_ordinal(0));
        assert!(!session.set_by_ordinal(6));
        assert!(!session.set_by_ordinal(-4));
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_limit_bounds_the_collection() {
        let session = BookmarkSession::with_limit(SimStore::with_articles(10), 4);
        assert_eq!(session.count(), 4);
    }

    #[test]
    fn test_current_info() {
        let mut session = session_with(3);
        session.last();
        let info = session.current_info().unwrap();
        assert_eq!(info.index, 2);
        assert_eq!(info.total, 3);
        assert_eq!(info.ordinal(), 3);
        assert_eq!(info.title, session.titles()[2]);
    }

    #[test]
    fn test_delete_last_strands_cursor_until_next_query() {
        let mut session = session_with(3);
        session.last();
        let title = session.delete_current().unwrap();
        assert_eq!(title, "Sample article 3");

        // The cursor is not silently moved; bounds are re-derived on read
        assert!(!session.is_valid());
        assert!(matches!(
            session.current_title(),
            Err(ReaderError::IndexOutOfRange { ordinal: 3, count: 2 })
        ));
        assert!(!session.next());
        assert!(session.prev());
        assert_eq!(session.current_index(), 1);
        assert!(session.is_valid());
    }

    #[test]
    fn test_archive_removes_from_list() {
        let session = session_with(2);
        session.archive_current().unwrap();
        assert_eq!(session.titles(), vec!["Sample article 2".to_string()]);
    }

    #[test]
    fn test_star_failure_reports_remote_error() {
        let store = SimStore::with_articles(2);
        store.fail_mutations(true);
        let session = BookmarkSession::new(store);
        let err = session.star_current().unwrap_err();
        assert!(matches!(
            err,
            ReaderError::RemoteOperationFailed {
                operation: Operation::Star,
                ..
            }
        ));
        assert!(!session.store().is_starred(0));
    }

    #[test]
    fn test_add_url_validation() {
        let session = session_with(1);
        assert!(matches!(
            session.add_url("   "),
            Err(ReaderError::InvalidInput(_))
        ));
        assert_eq!(
            session.add_url("  https://example.com/a ").unwrap(),
            "https://example.com/a"
        );
        assert_eq!(session.count(), 2);
    }

    #[test]
    fn test_highlight_for_current_trims_text() {
        let session = session_with(1);
        session.create_highlight_for_current("  A quote.  ").unwrap();
        assert_eq!(session.store().highlights()[0].1, "A quote.");
        assert!(matches!(
            session.create_highlight_for_current(" "),
            Err(ReaderError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_article_by_ordinal_does_not_move_cursor() {
        let session = session_with(3);
        let body = session.article_by_ordinal(2).unwrap();
        assert!(!body.is_blank());
        assert_eq!(session.current_index(), 0);
        assert!(matches!(
            session.article_by_ordinal(9),
            Err(ReaderError::IndexOutOfRange { ordinal: 9, count: 3 })
        ));
    }

    #[test]
    fn test_current_sentences_and_no_content() {
        let store = SimStore::with_articles(1);
        store.push_article("Blank", "https://example.com/blank", "  \n ");
        let mut session = BookmarkSession::new(store);

        let sentences = session.current_sentences().unwrap();
        assert!(sentences.len() > 1);

        session.last();
        assert!(matches!(
            session.current_sentences(),
            Err(ReaderError::NoContent)
        ));
    }

    #[test]
    fn test_sentences_for_does_not_refetch_the_list() {
        let store = SimStore::with_articles(2);
        let session = BookmarkSession::new(store);

        let mark = session.current_bookmark().unwrap();
        assert_eq!(mark.title, "Sample article 1");
        assert_eq!(session.store().list_fetches(), 1);

        let sentences = session.sentences_for(&mark.id).unwrap();
        assert!(!sentences.is_empty());
        let body = session.article_for(&mark.id).unwrap();
        assert!(!body.is_blank());
        assert_eq!(session.store().list_fetches(), 1);

        // The one-call forms each fetch the list once
        assert_eq!(session.current_article().unwrap(), body);
        assert_eq!(session.current_sentences().unwrap(), sentences);
        assert_eq!(session.store().list_fetches(), 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_next_lands_on_min(size in 1usize..20, start in 0usize..20, steps in 0usize..30) {
            let start = start % size;
            let mut session = session_with(size);
            prop_assert!(session.set_by_ordinal(start as i64 + 1));

            for _ in 0..steps {
                let at_end = session.current_index() == size - 1;
                prop_assert_eq!(session.next(), !at_end);
            }
            prop_assert_eq!(session.current_index(), (start + steps).min(size - 1));
        }

        #[test]
        fn prop_prev_after_first_stays_at_zero(size in 1usize..20, steps in 0usize..10) {
            let mut session = session_with(size);
            session.last();
            prop_assert!(session.first());
            for _ in 0..steps {
                prop_assert!(!session.prev());
            }
            prop_assert_eq!(session.current_index(), 0);
        }

        #[test]
        fn prop_out_of_range_ordinal_is_rejected(size in 0usize..20, start in 0usize..20) {
            let mut session = session_with(size);
            if size > 0 {
                session.set_by_ordinal((start % size) as i64 + 1);
            }
            let before = session.current_index();
            prop_assert!(!session.set_by_ordinal(0));
            prop_assert!(!session.set_by_ordinal(size as i64 + 1));
            prop_assert_eq!(session.current_index(), before);
        }
    }
}

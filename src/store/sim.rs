//! Simulated reading list for demos and tests
//!
//! Registered as provider "sim". No credentials or network required. Every
//! operation of the real store is supported: delete and archive remove the
//! bookmark, star flags it, add appends, and highlights are recorded so tests
//! can inspect them. Fetches and mutations can be made to fail on demand.

use std::cell::{Cell, RefCell};

use crate::core::{
    ArticleBody, BookmarkId, BookmarkSummary, HighlightGateway, ReadingList, RemoteError,
};

const SAMPLE_ARTICLES: &[(&str, &str, &str)] = &[
    (
        "The Quiet Art of Reading Slowly",
        "https://example.com/articles/reading-slowly",
        "Most of us read the way we eat at airports. We hurry, we skim, and we \
         forget. Slow reading asks for something different. It asks you to stay \
         with one sentence until it has finished speaking.\n\n\
         That is harder than it sounds! The eye wants to run ahead. Yet the \
         sentences that matter tend to reward a second look.",
    ),
    (
        "Notes on Terminal Interfaces",
        "https://example.com/articles/terminal-interfaces",
        "A terminal is a strange kind of canvas. It has no pixels, only cells. \
         Every program that draws on it must agree on a few rules: how to clear \
         the screen, how to move the cursor, and how to give the terminal back \
         when it is done.\n\n\
         Forgetting the last rule is the classic bug. Who has not had to type \
         reset after a crashed program?",
    ),
    (
        "Why Bookmarks Pile Up",
        "https://example.com/articles/bookmarks-pile-up",
        "Saving an article feels like progress. It is not. The reading list \
         grows, and the guilt grows with it.\n\n\
         One cure is to read a single sentence at a time. Another is to archive \
         without reading. Both are fine.",
    ),
];

#[derive(Debug, Clone)]
struct SimBookmark {
    summary: BookmarkSummary,
    body: String,
}

/// In-memory reading list
#[derive(Debug, Default)]
pub struct SimStore {
    bookmarks: RefCell<Vec<SimBookmark>>,
    archived: RefCell<Vec<SimBookmark>>,
    highlights: RefCell<Vec<(BookmarkId, String)>>,
    next_id: Cell<u64>,
    fail_fetches: Cell<bool>,
    fail_mutations: Cell<bool>,
    list_fetches: Cell<usize>,
}

impl SimStore {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Default::default()
        }
    }

    /// Store seeded with the built-in sample articles
    pub fn sample() -> Self {
        let store = Self::new();
        for (title, url, body) in SAMPLE_ARTICLES {
            store.push_article(title, url, body);
        }
        store
    }

    /// Store with `count` generic articles titled "Sample article N"
    pub fn with_articles(count: usize) -> Self {
        let store = Self::new();
        for n in 1..=count {
            let (_, _, body) = SAMPLE_ARTICLES[(n - 1) % SAMPLE_ARTICLES.len()];
            store.push_article(
                &format!("Sample article {}", n),
                &format!("https://example.com/articles/{}", n),
                body,
            );
        }
        store
    }

    /// Append an article, returning its handle
    pub fn push_article(&self, title: &str, url: &str, body: &str) -> BookmarkId {
        let id = BookmarkId::new(self.next_id.get().to_string());
        self.next_id.set(self.next_id.get() + 1);
        self.bookmarks.borrow_mut().push(SimBookmark {
            summary: BookmarkSummary {
                id: id.clone(),
                title: title.to_string(),
                url: url.to_string(),
                starred: false,
            },
            body: body.to_string(),
        });
        id
    }

    /// Make `fetch_bookmarks` and `fetch_body` fail
    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.set(fail);
    }

    /// Make delete, star, archive, add and highlight fail
    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.set(fail);
    }

    pub fn is_starred(&self, index: usize) -> bool {
        self.bookmarks
            .borrow()
            .get(index)
            .is_some_and(|b| b.summary.starred)
    }

    /// Number of `fetch_bookmarks` calls so far, failed ones included
    pub fn list_fetches(&self) -> usize {
        self.list_fetches.get()
    }

    pub fn highlights(&self) -> Vec<(BookmarkId, String)> {
        self.highlights.borrow().clone()
    }

    pub fn archived_titles(&self) -> Vec<String> {
        self.archived
            .borrow()
            .iter()
            .map(|b| b.summary.title.clone())
            .collect()
    }

    fn check_fetch(&self) -> Result<(), RemoteError> {
        if self.fail_fetches.get() {
            return Err(RemoteError::Network("simulated fetch failure".to_string()));
        }
        Ok(())
    }

    fn check_mutation(&self) -> Result<(), RemoteError> {
        if self.fail_mutations.get() {
            return Err(RemoteError::ServiceError(
                "simulated remote failure".to_string(),
            ));
        }
        Ok(())
    }

    fn position(&self, bookmark: &BookmarkId) -> Result<usize, RemoteError> {
        self.bookmarks
            .borrow()
            .iter()
            .position(|b| &b.summary.id == bookmark)
            .ok_or_else(|| RemoteError::NotFound(bookmark.to_string()))
    }
}

impl HighlightGateway for SimStore {
    fn create_highlight(&self, bookmark: &BookmarkId, text: &str) -> Result<(), RemoteError> {
        self.check_mutation()?;
        self.position(bookmark)?;
        self.highlights
            .borrow_mut()
            .push((bookmark.clone(), text.to_string()));
        Ok(())
    }
}

impl ReadingList for SimStore {
    fn name(&self) -> &str {
        "sim"
    }

    fn fetch_bookmarks(&self, limit: usize) -> Result<Vec<BookmarkSummary>, RemoteError> {
        self.list_fetches.set(self.list_fetches.get() + 1);
        self.check_fetch()?;
        Ok(self
            .bookmarks
            .borrow()
            .iter()
            .take(limit)
            .map(|b| b.summary.clone())
            .collect())
    }

    fn fetch_body(&self, bookmark: &BookmarkId) -> Result<ArticleBody, RemoteError> {
        self.check_fetch()?;
        let index = self.position(bookmark)?;
        Ok(ArticleBody::new(self.bookmarks.borrow()[index].body.clone()))
    }

    fn delete_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError> {
        self.check_mutation()?;
        let index = self.position(bookmark)?;
        self.bookmarks.borrow_mut().remove(index);
        Ok(())
    }

    fn star_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError> {
        self.check_mutation()?;
        let index = self.position(bookmark)?;
        self.bookmarks.borrow_mut()[index].summary.starred = true;
        Ok(())
    }

    fn archive_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError> {
        self.check_mutation()?;
        let index = self.position(bookmark)?;
        let removed = self.bookmarks.borrow_mut().remove(index);
        self.archived.borrow_mut().push(removed);
        Ok(())
    }

    fn add_bookmark(&self, url: &str) -> Result<(), RemoteError> {
        self.check_mutation()?;
        self.push_article(url, url, "");
        Ok(())
    }
}

//! Domain error types
//!
//! `RemoteError` describes what went wrong talking to the reading-list store;
//! `ReaderError` is what the reader reports back to the user. Every
//! `ReaderError` except `Interrupted` is recovered where it happens and shown
//! as a single line of output.

use thiserror::Error;

/// Failures from the remote reading-list store
///
/// Lets callers tell an expired login apart from a flaky network without
/// string matching:
/// - `Unauthorized` (401/403) - credentials rejected
/// - `RateLimited` (429) - too many requests
/// - `BadRequest` (400) - malformed request
/// - `ServiceError` (5xx) - server-side issue
/// - `Network` - connection refused, timeout, TLS failure
/// - `Api` - structured error payload returned by the store
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Error object reported by the API itself
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The store answered but the body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The requested bookmark does not exist (any more)
    #[error("Bookmark not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RemoteError {
    /// Map an HTTP status and response text onto a typed error
    pub fn from_http_status(status: u16, error_text: String) -> Self {
        match status {
            401 | 403 => RemoteError::Unauthorized(error_text),
            429 => RemoteError::RateLimited(error_text),
            400 => RemoteError::BadRequest(error_text),
            404 => RemoteError::NotFound(error_text),
            500..=599 => RemoteError::ServiceError(error_text),
            _ => RemoteError::Other(anyhow::anyhow!("HTTP {}: {}", status, error_text)),
        }
    }
}

/// Remote operations that mutate or annotate a bookmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Delete,
    Star,
    Archive,
    Add,
    Highlight,
    FetchBody,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Delete => "delete",
            Operation::Star => "star",
            Operation::Archive => "archive",
            Operation::Add => "add",
            Operation::Highlight => "highlight",
            Operation::FetchBody => "fetch article",
        };
        f.write_str(name)
    }
}

/// User-facing failures of reader operations
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The collection could not be fetched, or it is empty
    #[error("No bookmarks available")]
    CollectionUnavailable,

    /// A 1-based ordinal or the current cursor lies outside the collection
    #[error("Bookmark {ordinal} is out of range (1-{count})")]
    IndexOutOfRange { ordinal: i64, count: usize },

    /// A remote call failed; the operation is treated as not having happened
    #[error("Failed to {operation}: {source}")]
    RemoteOperationFailed {
        operation: Operation,
        #[source]
        source: RemoteError,
    },

    /// Segmentation produced no sentences
    #[error("Article has no readable content")]
    NoContent,

    /// Empty URL, empty highlight text and similar
    #[error("{0}")]
    InvalidInput(String),

    /// Acquiring or releasing raw terminal mode failed
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The user interrupted speak mode (Ctrl-C)
    #[error("Interrupted")]
    Interrupted,
}

impl ReaderError {
    pub fn remote(operation: Operation, source: RemoteError) -> Self {
        ReaderError::RemoteOperationFailed { operation, source }
    }

    /// Whether the process should stop after reporting this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReaderError::Interrupted)
    }
}

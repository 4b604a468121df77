//! Core domain modules
//!
//! Navigation over the reading list, sentence segmentation and text wrapping.
//! Nothing in here touches the terminal or the network directly.

pub mod errors;
pub mod segmenter;
pub mod session;
pub mod text;
pub mod traits;
pub mod types;

pub use errors::{Operation, ReaderError, RemoteError};
pub use segmenter::{SentenceSegmenter, UnicodeSentences};
pub use session::{BookmarkSession, DEFAULT_BOOKMARK_LIMIT};
pub use text::wrap;
pub use traits::{BoundaryModel, HighlightGateway, ReadingList};
pub use types::{ArticleBody, BookmarkId, BookmarkInfo, BookmarkSummary, Sentence};

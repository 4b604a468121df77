//! ip-conductor: a terminal reader for an Instapaper reading list
//!
//! This library provides:
//! - A cursor over the remote reading list with bounded navigation
//! - Sentence segmentation with exact offsets back into the article text
//! - Speak mode: one sentence per screen, with highlights, in raw terminal mode
//! - An Instapaper store (OAuth 1.0a) and an in-memory simulated store

pub mod config;
pub mod core;
pub mod store;
pub mod transport;
pub mod tui;

pub use crate::config::Config;
pub use crate::core::{
    BookmarkSession, ReaderError, ReadingList, RemoteError, Sentence, SentenceSegmenter,
};
pub use crate::transport::Shell;

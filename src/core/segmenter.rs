//! Sentence segmentation with exact source offsets
//!
//! Boundaries come from a [`BoundaryModel`]; the default is the Unicode
//! sentence-boundary algorithm (UAX #29). Each span is trimmed and its start
//! offset moved past any leading whitespace, so every sentence can be traced
//! back to the exact bytes it came from when a highlight is requested.

use unicode_segmentation::UnicodeSegmentation;

use super::traits::BoundaryModel;
use super::types::Sentence;

/// UAX #29 sentence boundaries
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentences;

impl BoundaryModel for UnicodeSentences {
    fn spans<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        text.split_sentence_bound_indices().collect()
    }
}

/// Turns article text into an ordered list of sentences
#[derive(Debug, Clone, Default)]
pub struct SentenceSegmenter<M = UnicodeSentences> {
    model: M,
}

impl SentenceSegmenter<UnicodeSentences> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: BoundaryModel> SentenceSegmenter<M> {
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    /// Lazily yield sentences in source order
    pub fn sentences<'a>(&self, raw_text: &'a str) -> Sentences<'a> {
        Sentences {
            spans: self.model.spans(raw_text).into_iter(),
        }
    }

    /// Segment the whole text
    ///
    /// An empty result from non-empty input means "no usable content", not an error.
    pub fn segment(&self, raw_text: &str) -> Vec<Sentence> {
        let sentences: Vec<Sentence> = self.sentences(raw_text).collect();
        tracing::debug!(
            bytes = raw_text.len(),
            sentences = sentences.len(),
            "Segmented article"
        );
        sentences
    }
}

/// Iterator over the sentences of one text
///
/// Whitespace-only spans are skipped. The end offset is the model's: any
/// trailing whitespace stays inside the range but not inside `text`.
pub struct Sentences<'a> {
    spans: std::vec::IntoIter<(usize, &'a str)>,
}

impl Iterator for Sentences<'_> {
    type Item = Sentence;

    fn next(&mut self) -> Option<Sentence> {
        for (start, span) in self.spans.by_ref() {
            let text = span.trim();
            if text.is_empty() {
                continue;
            }
            let leading = span.len() - span.trim_start().len();
            return Some(Sentence {
                text: text.to_string(),
                start: start + leading,
                end: start + span.len(),
            });
        }
        None
    }
}

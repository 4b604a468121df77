//! Speak mode - one sentence at a time
//!
//! `SpeakSession` holds the sentences and the cursor and decides what each key
//! does. `SpeakModeController` drives it: it owns raw mode for the whole loop,
//! renders frames, and steps out of raw mode to create highlights.

use super::events::SpeakKey;
use super::terminal::{RawModeGuard, Terminal};
use crate::core::{wrap, BookmarkId, HighlightGateway, ReaderError, Sentence};

/// Used when the terminal cannot report its size
const FALLBACK_ROWS: u16 = 24;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakState {
    Rendering,
    AwaitingKey,
    HighlightInProgress,
    Exited,
}

/// What the loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep reading; check `redraw_pending` for whether the frame changed
    Continue,
    Highlight,
    Exit,
    Interrupt,
}

/// Sentences plus a cursor; `cursor == len` means the reader ran past the end
#[derive(Debug, Clone)]
pub struct SpeakSession {
    sentences: Vec<Sentence>,
    cursor: usize,
    redraw_pending: bool,
}

impl SpeakSession {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self {
            sentences,
            cursor: 0,
            redraw_pending: true,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn current(&self) -> Option<&Sentence> {
        self.sentences.get(self.cursor)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.sentences.len()
    }

    /// Whether the sentence must be drawn again before the next key is read
    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    fn mark_drawn(&mut self) {
        self.redraw_pending = false;
    }

    /// Apply one key to the cursor
    pub fn apply(&mut self, key: SpeakKey) -> KeyOutcome {
        match key {
            SpeakKey::Advance => {
                self.cursor = (self.cursor + 1).min(self.sentences.len());
                if self.is_finished() {
                    return KeyOutcome::Exit;
                }
                self.redraw_pending = true;
                KeyOutcome::Continue
            }
            SpeakKey::Back => {
                self.cursor = self.cursor.saturating_sub(1);
                self.redraw_pending = true;
                KeyOutcome::Continue
            }
            SpeakKey::Highlight => KeyOutcome::Highlight,
            SpeakKey::Quit => KeyOutcome::Exit,
            SpeakKey::Interrupt => KeyOutcome::Interrupt,
            SpeakKey::Other => KeyOutcome::Continue,
        }
    }
}

/// Lines of one frame: vertical padding, `[i/n]`, a blank line, the wrapped sentence
pub fn render_frame(
    sentence: &str,
    position: usize,
    total: usize,
    width: usize,
    rows: u16,
) -> Vec<String> {
    let body = wrap(sentence, width);
    let padding = (rows as usize).saturating_sub(body.len() + 2) / 2;

    let mut lines = vec![String::new(); padding];
    lines.push(format!("[{}/{}]", position, total));
    lines.push(String::new());
    lines.extend(body);
    lines
}

/// How a speak-mode run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakSummary {
    /// 0-based cursor when the loop ended
    pub cursor: usize,
    pub total: usize,
    /// Whether the reader advanced past the last sentence
    pub finished: bool,
    pub highlights_created: usize,
    pub highlights_failed: usize,
}

/// Drives one speak-mode run over one bookmark
pub struct SpeakModeController<'a, G: HighlightGateway + ?Sized> {
    session: SpeakSession,
    state: SpeakState,
    gateway: &'a G,
    bookmark: BookmarkId,
    line_width: usize,
    highlights_created: usize,
    highlights_failed: usize,
}

impl<'a, G: HighlightGateway + ?Sized> SpeakModeController<'a, G> {
    pub fn new(
        sentences: Vec<Sentence>,
        gateway: &'a G,
        bookmark: BookmarkId,
        line_width: usize,
    ) -> Self {
        let session = SpeakSession::new(sentences);
        let state = if session.is_empty() {
            SpeakState::Exited
        } else {
            SpeakState::Rendering
        };
        Self {
            session,
            state,
            gateway,
            bookmark,
            line_width,
            highlights_created: 0,
            highlights_failed: 0,
        }
    }

    pub fn state(&self) -> SpeakState {
        self.state
    }

    pub fn session(&self) -> &SpeakSession {
        &self.session
    }

    /// Run the key loop until the reader quits, runs off the end, or interrupts
    ///
    /// Raw mode is held for the whole loop and released before this returns,
    /// whatever the outcome.
    pub fn run<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
    ) -> Result<SpeakSummary, ReaderError> {
        if self.session.is_empty() {
            self.state = SpeakState::Exited;
            return Err(ReaderError::NoContent);
        }

        tracing::debug!(
            bookmark = %self.bookmark,
            sentences = self.session.len(),
            "Entering speak mode"
        );

        let mut interrupted = false;
        let mut guard = RawModeGuard::acquire(terminal)?;
        self.state = SpeakState::Rendering;

        loop {
            match self.state {
                SpeakState::Rendering => {
                    self.render(guard.terminal())?;
                    self.state = SpeakState::AwaitingKey;
                }
                SpeakState::AwaitingKey => {
                    let event = guard.terminal().read_key()?;
                    self.state = match self.session.apply(SpeakKey::from_event(&event)) {
                        KeyOutcome::Continue => self.next_frame_state(),
                        KeyOutcome::Highlight => SpeakState::HighlightInProgress,
                        KeyOutcome::Exit => SpeakState::Exited,
                        KeyOutcome::Interrupt => {
                            interrupted = true;
                            SpeakState::Exited
                        }
                    };
                }
                SpeakState::HighlightInProgress => {
                    self.highlight(&mut guard)?;
                    self.state = self.next_frame_state();
                }
                SpeakState::Exited => break,
            }
        }

        guard.terminal().clear()?;
        guard.release()?;

        let summary = SpeakSummary {
            cursor: self.session.cursor(),
            total: self.session.len(),
            finished: self.session.is_finished(),
            highlights_created: self.highlights_created,
            highlights_failed: self.highlights_failed,
        };
        tracing::debug!(?summary, interrupted, "Left speak mode");

        if interrupted {
            return Err(ReaderError::Interrupted);
        }
        Ok(summary)
    }

    fn next_frame_state(&self) -> SpeakState {
        if self.session.redraw_pending() {
            SpeakState::Rendering
        } else {
            SpeakState::AwaitingKey
        }
    }

    fn render<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<(), ReaderError> {
        let Some(sentence) = self.session.current() else {
            return Ok(());
        };
        let rows = terminal.size().map(|(_, rows)| rows).unwrap_or(FALLBACK_ROWS);
        let lines = render_frame(
            &sentence.text,
            self.session.cursor() + 1,
            self.session.len(),
            self.line_width,
            rows,
        );
        terminal.draw(&lines)?;
        self.session.mark_drawn();
        Ok(())
    }

    /// Create a highlight for the current sentence with raw mode released
    ///
    /// A failed highlight is reported and otherwise ignored. The sentence is not redrawn.
    fn highlight<T: Terminal + ?Sized>(
        &mut self,
        guard: &mut RawModeGuard<'_, T>,
    ) -> Result<(), ReaderError> {
        let Some(text) = self.session.current().map(|s| s.text.clone()) else {
            return Ok(());
        };
        let gateway = self.gateway;
        let bookmark = &self.bookmark;

        let created = guard.suspend(|terminal| {
            let (ok, message) = match gateway.create_highlight(bookmark, &text) {
                Ok(()) => {
                    tracing::info!(bookmark = %bookmark, "Highlight created");
                    (true, "✓ Highlighted".to_string())
                }
                Err(err) => {
                    tracing::warn!(bookmark = %bookmark, "Highlight failed: {}", err);
                    (false, format!("✗ Highlight failed: {}", err))
                }
            };
            terminal.print_line(&message).map(|_| ok)
        })??;

        if created {
            self.highlights_created += 1;
        } else {
            self.highlights_failed += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sentences(n: usize) -> Vec<Sentence> {
        (0..n)
            .map(|i| Sentence {
                text: format!("Sentence {}.", i + 1),
                start: i * 12,
                end: i * 12 + 11,
            })
            .collect()
    }

    #[test]
    fn test_space_space_back_quit() {
        let mut session = SpeakSession::new(sentences(3));
        let mut trace = vec![session.cursor()];
        for key in [SpeakKey::Advance, SpeakKey::Advance, SpeakKey::Back] {
            assert_eq!(session.apply(key), KeyOutcome::Continue);
            assert!(session.redraw_pending());
            session.mark_drawn();
            trace.push(session.cursor());
        }
        assert_eq!(trace, vec![0, 1, 2, 1]);
        assert_eq!(session.apply(SpeakKey::Quit), KeyOutcome::Exit);
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_back_at_first_sentence_is_a_no_op() {
        let mut session = SpeakSession::new(sentences(2));
        session.mark_drawn();
        assert_eq!(session.apply(SpeakKey::Back), KeyOutcome::Continue);
        assert_eq!(session.cursor(), 0);
        assert!(session.redraw_pending());
    }

    #[test]
    fn test_advance_past_last_sentence_exits() {
        let mut session = SpeakSession::new(sentences(1));
        assert_eq!(session.apply(SpeakKey::Advance), KeyOutcome::Exit);
        assert!(session.is_finished());
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_other_keys_do_not_request_redraw() {
        let mut session = SpeakSession::new(sentences(2));
        session.mark_drawn();
        assert_eq!(session.apply(SpeakKey::Other), KeyOutcome::Continue);
        assert_eq!(session.apply(SpeakKey::Highlight), KeyOutcome::Highlight);
        assert!(!session.redraw_pending());
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_empty_controller_starts_exited() {
        let store = crate::store::SimStore::new();
        let controller = SpeakModeController::new(Vec::new(), &store, BookmarkId::new("1"), 70);
        assert_eq!(controller.state(), SpeakState::Exited);
    }

    #[test]
    fn test_render_frame_layout() {
        let lines = render_frame("Hello world.", 2, 5, 70, 10);
        // (10 - (1 + 2)) / 2 = 3 padding lines
        assert_eq!(
            lines,
            vec!["", "", "", "[2/5]", "", "Hello world."]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_render_frame_without_room_for_padding() {
        let text = "one two three four five six seven eight nine ten";
        let lines = render_frame(text, 1, 1, 4, 3);
        assert_eq!(lines[0], "[1/1]");
        assert_eq!(lines[1], "");
        assert_eq!(lines.len(), 2 + wrap(text, 4).len());
    }

    proptest! {
        #[test]
        fn prop_cursor_stays_in_bounds(
            len in 1usize..8,
            keys in prop::collection::vec(
                prop_oneof![
                    Just(SpeakKey::Advance),
                    Just(SpeakKey::Back),
                    Just(SpeakKey::Highlight),
                    Just(SpeakKey::Other),
                ],
                0..40,
            ),
        ) {
            let mut session = SpeakSession::new(sentences(len));
            for key in keys {
                let outcome = session.apply(key);
                if outcome == KeyOutcome::Exit {
                    prop_assert_eq!(session.cursor(), len);
                    break;
                }
                prop_assert!(session.cursor() < len);
            }
        }
    }
}

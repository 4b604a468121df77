//! Key decoding for speak mode

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means to the speak loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakKey {
    /// Space: next sentence
    Advance,
    /// `b`: previous sentence
    Back,
    /// `h`: highlight the current sentence
    Highlight,
    /// `q`: leave speak mode
    Quit,
    /// Ctrl+C, delivered as a key while raw mode is on
    Interrupt,
    /// Anything else; ignored without a redraw
    Other,
}

impl SpeakKey {
    pub fn from_event(key: &KeyEvent) -> Self {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => SpeakKey::Interrupt,
                _ => SpeakKey::Other,
            };
        }
        match key.code {
            KeyCode::Char(' ') => SpeakKey::Advance,
            KeyCode::Char('b') | KeyCode::Char('B') => SpeakKey::Back,
            KeyCode::Char('h') | KeyCode::Char('H') => SpeakKey::Highlight,
            KeyCode::Char('q') | KeyCode::Char('Q') => SpeakKey::Quit,
            _ => SpeakKey::Other,
        }
    }
}

impl From<KeyEvent> for SpeakKey {
    fn from(key: KeyEvent) -> Self {
        SpeakKey::from_event(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn make_key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_space_advances() {
        let key = make_key_event(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(SpeakKey::from_event(&key), SpeakKey::Advance);
    }

    #[test]
    fn test_letters_ignore_case() {
        for (c, expected) in [
            ('b', SpeakKey::Back),
            ('B', SpeakKey::Back),
            ('h', SpeakKey::Highlight),
            ('H', SpeakKey::Highlight),
            ('q', SpeakKey::Quit),
            ('Q', SpeakKey::Quit),
        ] {
            let key = make_key_event(KeyCode::Char(c), KeyModifiers::SHIFT);
            assert_eq!(SpeakKey::from_event(&key), expected, "key {:?}", c);
        }
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        let key = make_key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(SpeakKey::from_event(&key), SpeakKey::Interrupt);
    }

    #[test]
    fn test_other_keys() {
        let plain_c = make_key_event(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(SpeakKey::from_event(&plain_c), SpeakKey::Other);

        let ctrl_q = make_key_event(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(SpeakKey::from_event(&ctrl_q), SpeakKey::Other);

        let enter = make_key_event(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(SpeakKey::from(enter), SpeakKey::Other);
    }
}

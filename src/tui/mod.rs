//! Terminal side of speak mode
//!
//! Raw-mode handling, key decoding and the sentence-by-sentence reading loop.

mod events;
pub mod speak;
pub mod terminal;

pub use events::SpeakKey;
pub use speak::{
    render_frame, KeyOutcome, SpeakModeController, SpeakSession, SpeakState, SpeakSummary,
};
pub use terminal::{install_interrupt_handler, CrosstermTerminal, RawModeGuard, Terminal};

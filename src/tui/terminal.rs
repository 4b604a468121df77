//! Raw-mode terminal access
//!
//! Speak mode talks to the terminal through the [`Terminal`] trait so the loop
//! can be driven by a scripted terminal in tests. [`RawModeGuard`] owns raw
//! mode for a scope: it is released exactly once, on return, on error, and
//! while unwinding from a panic.

use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyEvent, KeyEventKind},
    queue,
    terminal::{self, Clear, ClearType},
};

/// Set while the process terminal is in raw mode, read by the Ctrl+C handler
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Terminal operations needed by speak mode
pub trait Terminal {
    fn enable_raw_mode(&mut self) -> io::Result<()>;

    fn disable_raw_mode(&mut self) -> io::Result<()>;

    /// Block until the next key press
    fn read_key(&mut self) -> io::Result<KeyEvent>;

    /// (columns, rows)
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Clear the screen and draw `lines` from the top-left corner
    fn draw(&mut self, lines: &[String]) -> io::Result<()>;

    /// Print one line below whatever is on screen
    fn print_line(&mut self, line: &str) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()>;
}

/// The process terminal, via crossterm
pub struct CrosstermTerminal {
    stdout: Stdout,
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Terminal for CrosstermTerminal {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);
        tracing::debug!("Entered raw mode");
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
        tracing::debug!("Left raw mode");
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            // Resize, focus and mouse events are not input for the reader
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key);
                }
            }
        }
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        queue!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        for line in lines {
            // Output post-processing is off in raw mode, so send the CR ourselves
            self.stdout.write_all(line.as_bytes())?;
            self.stdout.write_all(b"\r\n")?;
        }
        self.stdout.flush()
    }

    fn print_line(&mut self, line: &str) -> io::Result<()> {
        write!(self.stdout, "\r\n{}\r\n", line)?;
        self.stdout.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        self.stdout.flush()
    }
}

/// Scoped ownership of raw mode
pub struct RawModeGuard<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
    active: bool,
}

impl<'a, T: Terminal + ?Sized> RawModeGuard<'a, T> {
    /// Enter raw mode for the lifetime of the guard
    pub fn acquire(terminal: &'a mut T) -> io::Result<Self> {
        terminal.enable_raw_mode()?;
        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub fn terminal(&mut self) -> &mut T {
        self.terminal
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run `f` with raw mode released, then re-enter raw mode
    ///
    /// If `f` panics, raw mode stays released and the guard will not release it again.
    pub fn suspend<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> io::Result<R> {
        self.terminal.disable_raw_mode()?;
        self.active = false;
        let out = f(self.terminal);
        self.terminal.enable_raw_mode()?;
        self.active = true;
        Ok(out)
    }

    /// Leave raw mode now, reporting any failure
    pub fn release(mut self) -> io::Result<()> {
        self.active = false;
        self.terminal.disable_raw_mode()
    }
}

impl<T: Terminal + ?Sized> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            if let Err(err) = self.terminal.disable_raw_mode() {
                tracing::error!("Failed to restore terminal mode: {}", err);
            }
        }
    }
}

/// Install the Ctrl+C handler
///
/// Ctrl+C outside speak mode (or a SIGINT from elsewhere) releases raw mode if
/// it is held, says goodbye and exits with status 130.
pub fn install_interrupt_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if RAW_MODE_ACTIVE.load(Ordering::SeqCst) {
            let _ = terminal::disable_raw_mode();
        }
        println!("\nGoodbye!");
        std::process::exit(130);
    })
    .context("Failed to install Ctrl+C handler")
}

//! Speak-mode test driver
//!
//! `ScriptedTerminal` replays a fixed list of key presses and records what the
//! reader did with the terminal: raw-mode transitions, frames drawn and lines
//! printed.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ip_conductor::tui::Terminal;

/// One scripted input
#[derive(Debug, Clone)]
pub enum Step {
    Key(KeyEvent),
    /// `read_key` fails with an I/O error
    Fail,
}

/// Parse a key name: a single character, "Space", "Enter", "Escape" or "Ctrl+<char>"
pub fn key(name: &str) -> KeyEvent {
    if let Some(rest) = name.strip_prefix("Ctrl+") {
        let c = rest.chars().next().unwrap_or('c').to_ascii_lowercase();
        return KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
    }
    let code = match name {
        "Space" => KeyCode::Char(' '),
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Esc,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => panic!("unknown key name: {}", other),
            }
        }
    };
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn keys(names: &[&str]) -> Vec<Step> {
    names.iter().map(|name| Step::Key(key(name))).collect()
}

/// In-memory terminal driven by a script
pub struct ScriptedTerminal {
    script: VecDeque<Step>,
    pub rows: u16,
    pub raw: bool,
    pub enabled: usize,
    pub disabled: usize,
    pub clears: usize,
    pub frames: Vec<Vec<String>>,
    /// Printed lines, with whether raw mode was on at the time
    pub printed: Vec<(bool, String)>,
}

impl ScriptedTerminal {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script: script.into(),
            rows: 24,
            raw: false,
            enabled: 0,
            disabled: 0,
            clears: 0,
            frames: Vec::new(),
            printed: Vec::new(),
        }
    }

    pub fn with_keys(names: &[&str]) -> Self {
        Self::new(keys(names))
    }

    /// The `[i/n]` counter of every frame drawn, in order
    pub fn counters(&self) -> Vec<String> {
        self.frames
            .iter()
            .filter_map(|frame| frame.iter().find(|line| line.starts_with('[')).cloned())
            .collect()
    }

    pub fn remaining_steps(&self) -> usize {
        self.script.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        self.enabled += 1;
        self.raw = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        self.disabled += 1;
        self.raw = false;
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<KeyEvent> {
        match self.script.pop_front() {
            Some(Step::Key(key)) => Ok(key),
            Some(Step::Fail) => Err(io::Error::new(io::ErrorKind::Other, "scripted read failure")),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "script exhausted",
            )),
        }
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((80, self.rows))
    }

    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        self.frames.push(lines.to_vec());
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> io::Result<()> {
        self.printed.push((self.raw, line.to_string()));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }
}

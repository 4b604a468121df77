//! Command-line front ends: the interactive shell and one-shot commands

pub mod cli;
pub mod commands;

pub use cli::{speak_report, Flow, Shell};
pub use commands::{Command, CommandHandler, CommandInfo};

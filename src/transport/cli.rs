//! Interactive shell and one-shot commands
//!
//! The shell owns one `BookmarkSession` for its lifetime. Every reader error
//! is reported as a single line and the loop carries on; only an interrupt
//! from speak mode ends it early.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use super::commands::{Command, CommandHandler};
use crate::core::{wrap, BookmarkSession, ReaderError, ReadingList};
use crate::tui::{SpeakModeController, SpeakSummary, Terminal};

/// Whether the shell keeps reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Tabled)]
struct BookmarkRow {
    #[tabled(rename = "#")]
    ordinal: usize,
    #[tabled(rename = " ")]
    marker: &'static str,
    #[tabled(rename = "Title")]
    title: String,
}

/// Reading-list shell over one session and one terminal
pub struct Shell<R, T> {
    session: BookmarkSession<R>,
    terminal: T,
    handler: CommandHandler,
    line_width: usize,
}

impl<R: ReadingList, T: Terminal> Shell<R, T> {
    pub fn new(session: BookmarkSession<R>, terminal: T, line_width: usize) -> Self {
        Self {
            session,
            terminal,
            handler: CommandHandler::new(),
            line_width,
        }
    }

    pub fn session(&self) -> &BookmarkSession<R> {
        &self.session
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Read-eval-print loop until `exit`, end of input, or an interrupt
    pub fn run<I: BufRead, W: Write>(&mut self, input: &mut I, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "{}", "ip-conductor".bold().cyan())?;
        writeln!(
            out,
            "Reading list: {} ({} bookmarks). Type 'help' for commands.\n",
            self.session.store().name(),
            self.session.count()
        )?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = read_line(input)? else {
                writeln!(out, "\nGoodbye!")?;
                break;
            };

            let command = match self.handler.parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    writeln!(out, "{}", message.yellow())?;
                    continue;
                }
            };

            match self.execute(command, input, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => writeln!(out, "{}", err.to_string().yellow())?,
            }
        }
        Ok(())
    }

    /// Run commands in order, stopping at the first error
    pub fn run_once<W: Write>(&mut self, commands: Vec<Command>, out: &mut W) -> Result<(), ReaderError> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        for command in commands {
            if self.execute(command, &mut input, out)? == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command
    ///
    /// `input` is only read when `add` or `highlight` has to prompt for its argument.
    pub fn execute<I: BufRead, W: Write>(
        &mut self,
        command: Command,
        input: &mut I,
        out: &mut W,
    ) -> Result<Flow, ReaderError> {
        tracing::debug!(?command, "Executing command");
        match command {
            Command::Bookmarks => self.print_bookmarks(out)?,
            Command::Title => {
                let title = self.session.current_title()?;
                writeln!(out, "{}", title.bold())?;
            }
            Command::Info => {
                let info = self.session.current_info()?;
                writeln!(out, "Title: {}", info.title.bold())?;
                writeln!(out, "URL: {}", info.url)?;
                writeln!(out, "Position: {} of {}", info.ordinal(), info.total)?;
            }
            Command::Next => {
                let moved = self.session.next();
                self.report_move(moved, "next bookmark", "Already at last bookmark", out)?;
            }
            Command::Prev => {
                let moved = self.session.prev();
                self.report_move(moved, "previous bookmark", "Already at first bookmark", out)?;
            }
            Command::First => {
                let moved = self.session.first();
                self.report_move(moved, "first bookmark", "No bookmarks available", out)?;
            }
            Command::Last => {
                let moved = self.session.last();
                self.report_move(moved, "last bookmark", "No bookmarks available", out)?;
            }
            Command::Jump(ordinal) => {
                if !self.session.set_by_ordinal(ordinal) {
                    return Err(self.out_of_range(ordinal));
                }
                let title = self.session.current_title()?;
                writeln!(out, "Moved to bookmark {}: {}", ordinal, title.bold())?;
            }
            Command::Read(ordinal) => self.print_article(ordinal, out)?,
            Command::Speak => self.speak(out)?,
            Command::Add(url) => {
                let url = match url {
                    Some(url) => url,
                    None => prompt(input, out, "URL to add: ")?,
                };
                let added = self.session.add_url(&url)?;
                writeln!(out, "{} {}", "Added:".green(), added)?;
            }
            Command::Highlight(text) => {
                // Check the cursor before asking for text
                self.session.current_title()?;
                let text = match text {
                    Some(text) => text,
                    None => prompt(input, out, "Text to highlight: ")?,
                };
                let title = self.session.create_highlight_for_current(&text)?;
                writeln!(out, "{} {}", "Highlighted in:".green(), title)?;
            }
            Command::Star => {
                let title = self.session.star_current()?;
                writeln!(out, "{} {}", "Starred:".green(), title)?;
            }
            Command::Archive => {
                let title = self.session.archive_current()?;
                writeln!(out, "{} {}", "Archived:".green(), title)?;
            }
            Command::Delete => {
                let title = self.session.delete_current()?;
                writeln!(out, "{} {}", "Deleted:".green(), title)?;
            }
            Command::Help(topic) => match self.handler.help_text(topic.as_deref()) {
                Ok(help) => writeln!(out, "{}", help)?,
                Err(message) => writeln!(out, "{}", message.yellow())?,
            },
            Command::Exit => {
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn out_of_range(&self, ordinal: i64) -> ReaderError {
        match self.session.count() {
            0 => ReaderError::CollectionUnavailable,
            count => ReaderError::IndexOutOfRange { ordinal, count },
        }
    }

    fn report_move<W: Write>(
        &self,
        moved: bool,
        target: &str,
        stuck: &str,
        out: &mut W,
    ) -> Result<(), ReaderError> {
        if !moved {
            if self.session.count() == 0 {
                return Err(ReaderError::CollectionUnavailable);
            }
            writeln!(out, "{}", stuck)?;
            return Ok(());
        }
        let title = self.session.current_title()?;
        writeln!(out, "Moved to {}: {}", target, title.bold())?;
        Ok(())
    }

    fn print_bookmarks<W: Write>(&self, out: &mut W) -> Result<(), ReaderError> {
        let titles = self.session.titles();
        if titles.is_empty() {
            return Err(ReaderError::CollectionUnavailable);
        }

        let current = self.session.current_index();
        let total = titles.len();
        let rows: Vec<BookmarkRow> = titles
            .into_iter()
            .enumerate()
            .map(|(index, title)| BookmarkRow {
                ordinal: index + 1,
                marker: if index == current { "▶" } else { "" },
                title,
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        writeln!(out, "{}", table)?;
        writeln!(out, "Total: {} bookmarks", total)?;
        Ok(())
    }

    fn print_article<W: Write>(&self, ordinal: Option<i64>, out: &mut W) -> Result<(), ReaderError> {
        let body = match ordinal {
            Some(ordinal) => self.session.article_by_ordinal(ordinal)?,
            None => {
                let mark = self.session.current_bookmark()?;
                writeln!(out, "{}\n", mark.title.bold().cyan())?;
                self.session.article_for(&mark.id)?
            }
        };
        if body.is_blank() {
            return Err(ReaderError::NoContent);
        }

        for paragraph in body.raw_text.split("\n\n") {
            let lines = wrap(paragraph, self.line_width);
            if lines.is_empty() {
                continue;
            }
            for line in lines {
                writeln!(out, "{}", line)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn speak<W: Write>(&mut self, out: &mut W) -> Result<(), ReaderError> {
        // One list fetch, so the title and highlight target match the spoken text
        let mark = self.session.current_bookmark()?;
        let sentences = self.session.sentences_for(&mark.id)?;

        let mut controller =
            SpeakModeController::new(sentences, self.session.store(), mark.id, self.line_width);
        let summary = controller.run(&mut self.terminal)?;
        writeln!(out, "{}", speak_report(&mark.title, &summary))?;
        Ok(())
    }
}

/// One line describing how a speak-mode run ended
pub fn speak_report(title: &str, summary: &SpeakSummary) -> String {
    let mut report = if summary.finished {
        format!("Finished reading: {}", title)
    } else {
        format!(
            "Stopped at sentence {} of {}: {}",
            summary.cursor + 1,
            summary.total,
            title
        )
    };
    match summary.highlights_created {
        0 => {}
        1 => report.push_str(" (1 highlight)"),
        n => report.push_str(&format!(" ({} highlights)", n)),
    }
    if summary.highlights_failed > 0 {
        report.push_str(&format!(" ({} failed)", summary.highlights_failed));
    }
    report
}

/// Next line of input without its line ending; `None` at end of input
fn read_line<I: BufRead>(input: &mut I) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Ask for an argument; end of input reads as an empty answer
fn prompt<I: BufRead, W: Write>(input: &mut I, out: &mut W, label: &str) -> io::Result<String> {
    write!(out, "{}", label)?;
    out.flush()?;
    Ok(read_line(input)?.unwrap_or_default())
}

//! REPL command parsing
//!
//! Commands are case-insensitive and have no leading sigil. A bare integer
//! jumps to that bookmark.

use std::collections::HashMap;

/// A parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bookmarks,
    Add(Option<String>),
    Delete,
    Star,
    Highlight(Option<String>),
    Archive,
    Speak,
    Title,
    Info,
    Next,
    Prev,
    First,
    Last,
    Read(Option<i64>),
    /// Bare integer: jump to that 1-based ordinal
    Jump(i64),
    Help(Option<String>),
    Exit,
}

/// Help entry for a registered command
#[derive(Debug, Clone)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
}

/// Registry of command names and aliases
pub struct CommandHandler {
    commands: HashMap<&'static str, CommandInfo>,
    aliases: HashMap<&'static str, &'static str>,
    /// Registration order, used for help output
    order: Vec<&'static str>,
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler {
    pub fn new() -> Self {
        let mut handler = Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
            order: Vec::new(),
        };
        handler.register_all();
        handler
    }

    fn register_all(&mut self) {
        self.register("bookmarks", "List bookmarks with their numbers", "bookmarks");
        self.register("title", "Show the current bookmark's title", "title");
        self.register("info", "Show title, URL and position of the current bookmark", "info");
        self.register("next", "Move to the next bookmark", "next");
        self.register("prev", "Move to the previous bookmark", "prev");
        self.register("first", "Move to the first bookmark", "first");
        self.register("last", "Move to the last bookmark", "last");
        self.register("read", "Print the current article, or bookmark N", "read [N]");
        self.register("speak", "Read the current article one sentence at a time", "speak");
        self.register("add", "Save a URL to the reading list", "add [URL]");
        self.register("highlight", "Highlight text in the current article", "highlight [TEXT]");
        self.register("star", "Star the current bookmark", "star");
        self.register("archive", "Archive the current bookmark", "archive");
        self.register("delete", "Delete the current bookmark", "delete");
        self.register("help", "Show available commands", "help [command]");
        self.register("exit", "Leave the reader", "exit");

        self.add_alias("articles", "bookmarks");
        self.add_alias("previous", "prev");
        self.add_alias("quit", "exit");
    }

    fn register(&mut self, name: &'static str, description: &'static str, usage: &'static str) {
        self.order.push(name);
        self.commands.insert(
            name,
            CommandInfo {
                name,
                description,
                usage,
            },
        );
    }

    fn add_alias(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.insert(alias, target);
    }

    /// Resolve an alias to its target command name
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).copied().unwrap_or(name)
    }

    pub fn get_command(&self, name: &str) -> Option<&CommandInfo> {
        let name = name.to_lowercase();
        self.commands.get(self.resolve_alias(&name))
    }

    /// Split input into lowercase command name and the rest of the line
    pub fn split(input: &str) -> Option<(String, &str)> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        match input.find(char::is_whitespace) {
            Some(idx) => Some((input[..idx].to_lowercase(), input[idx..].trim_start())),
            None => Some((input.to_lowercase(), "")),
        }
    }

    /// Parse one line of input
    ///
    /// Blank input gives `Ok(None)`; an unknown command or a bad argument gives
    /// `Err` with a message for the user.
    pub fn parse(&self, input: &str) -> Result<Option<Command>, String> {
        let Some((name, args)) = Self::split(input) else {
            return Ok(None);
        };

        if args.is_empty() && is_integer(&name) {
            return parse_ordinal(&name).map(|ordinal| Some(Command::Jump(ordinal)));
        }

        let optional = |args: &str| (!args.is_empty()).then(|| args.to_string());

        let command = match self.resolve_alias(&name) {
            "bookmarks" => Command::Bookmarks,
            "title" => Command::Title,
            "info" => Command::Info,
            "next" => Command::Next,
            "prev" => Command::Prev,
            "first" => Command::First,
            "last" => Command::Last,
            "speak" => Command::Speak,
            "star" => Command::Star,
            "archive" => Command::Archive,
            "delete" => Command::Delete,
            "exit" => Command::Exit,
            "add" => Command::Add(optional(args)),
            "highlight" => Command::Highlight(optional(args)),
            "help" => Command::Help(optional(args)),
            "read" => match args {
                "" => Command::Read(None),
                n if is_integer(n) => Command::Read(Some(parse_ordinal(n)?)),
                n => return Err(format!("Invalid bookmark number: {}", n)),
            },
            _ => {
                return Err(format!(
                    "Unknown command: {}. Type 'help' for a list of commands.",
                    name
                ))
            }
        };
        Ok(Some(command))
    }

    /// Help for every command, or for one
    pub fn help_text(&self, topic: Option<&str>) -> Result<String, String> {
        if let Some(topic) = topic {
            return match self.get_command(topic.trim()) {
                Some(info) => Ok(format!(
                    "{} - {}\nUsage: {}",
                    info.name, info.description, info.usage
                )),
                None => Err(format!("Unknown command: {}", topic.trim())),
            };
        }

        let mut help = String::from("Available commands:\n\n");
        for name in &self.order {
            if let Some(info) = self.commands.get(name) {
                help.push_str(&format!("  {:<18} {}\n", info.usage, info.description));
            }
        }
        help.push_str("  <N>                Jump to bookmark N\n");
        help.push_str("\nAliases: articles = bookmarks, previous = prev, quit = exit\n");
        Ok(help)
    }
}

/// Optional sign followed by ASCII digits
fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Integers too large for an ordinal are out of range rather than unknown commands
fn parse_ordinal(token: &str) -> Result<i64, String> {
    token
        .parse::<i64>()
        .map_err(|_| format!("Bookmark {} is out of range", token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command_with_args() {
        assert_eq!(
            CommandHandler::split("  ADD   https://example.com  "),
            Some(("add".to_string(), "https://example.com"))
        );
        assert_eq!(CommandHandler::split("next"), Some(("next".to_string(), "")));
        assert_eq!(CommandHandler::split("   "), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("NEXT"), Ok(Some(Command::Next)));
        assert_eq!(handler.parse("Speak"), Ok(Some(Command::Speak)));
        assert_eq!(handler.parse("bookmarks"), Ok(Some(Command::Bookmarks)));
    }

    #[test]
    fn test_resolve_alias() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("articles"), Ok(Some(Command::Bookmarks)));
        assert_eq!(handler.parse("Previous"), Ok(Some(Command::Prev)));
        assert_eq!(handler.parse("quit"), Ok(Some(Command::Exit)));
        assert_eq!(handler.resolve_alias("next"), "next");
    }

    #[test]
    fn test_bare_integer_jumps() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("3"), Ok(Some(Command::Jump(3))));
        assert_eq!(handler.parse("-1"), Ok(Some(Command::Jump(-1))));
        assert_eq!(handler.parse("+2"), Ok(Some(Command::Jump(2))));
    }

    #[test]
    fn test_oversized_integer_is_out_of_range() {
        let handler = CommandHandler::new();
        let huge = "99999999999999999999";
        assert_eq!(
            handler.parse(huge),
            Err(format!("Bookmark {} is out of range", huge))
        );
        assert_eq!(
            handler.parse(&format!("read {}", huge)),
            Err(format!("Bookmark {} is out of range", huge))
        );
        assert_eq!(
            handler.parse("-99999999999999999999"),
            Err("Bookmark -99999999999999999999 is out of range".to_string())
        );
        assert!(handler.parse("-").unwrap_err().starts_with("Unknown command"));
    }

    #[test]
    fn test_read_with_and_without_ordinal() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("read"), Ok(Some(Command::Read(None))));
        assert_eq!(handler.parse("read 2"), Ok(Some(Command::Read(Some(2)))));
        assert!(handler.parse("read two").is_err());
    }

    #[test]
    fn test_optional_arguments_keep_case() {
        let handler = CommandHandler::new();
        assert_eq!(
            handler.parse("highlight The Quick Fox."),
            Ok(Some(Command::Highlight(Some("The Quick Fox.".to_string()))))
        );
        assert_eq!(handler.parse("add"), Ok(Some(Command::Add(None))));
    }

    #[test]
    fn test_blank_and_unknown_input() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse(""), Ok(None));
        let err = handler.parse("frobnicate").unwrap_err();
        assert!(err.contains("Unknown command: frobnicate"));
    }

    #[test]
    fn test_help_text() {
        let handler = CommandHandler::new();
        let all = handler.help_text(None).unwrap();
        assert!(all.contains("bookmarks"));
        assert!(all.contains("Jump to bookmark N"));

        let one = handler.help_text(Some("previous")).unwrap();
        assert!(one.starts_with("prev - "));
        assert!(handler.help_text(Some("nope")).is_err());
    }
}

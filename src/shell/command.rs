//! Shell input parsing.
//!
//! Lines starting with `.` are commands; anything else is an expression.

// ============================================================================
// Imports
// ============================================================================

use crate::error::Result;
use crate::identifiers::{SocketId, TabId};

// ============================================================================
// Constants
// ============================================================================

/// Commands and their help text, in `.help` order.
pub const COMMAND_HELP: &[(&str, &str)] = &[
    ("clear", "Switch to default extension context"),
    ("exit", "Exit the shell"),
    ("help", "Print this help message"),
    ("page", "Switch to page context of <tabId>"),
    ("socket", "Connect to beval socket <id>"),
    ("sockets", "List all sockets"),
    ("tab", "Switch to <tabId> context"),
    ("tabs", "List all tabs"),
];

// ============================================================================
// Input
// ============================================================================

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Empty or whitespace-only line.
    Blank,
    /// Expression to evaluate in the current context.
    Eval(String),
    /// Dot command.
    Command(ShellCommand),
}

impl Input {
    /// Parses a line read from the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if a command argument is
    /// not a valid id.
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Ok(Self::Blank);
        }

        // `.5` is a number literal, not a command.
        match trimmed.strip_prefix('.') {
            Some(rest) if !rest.starts_with(|c: char| c.is_ascii_digit()) => {
                ShellCommand::parse(rest).map(Self::Command)
            }
            _ => Ok(Self::Eval(line.to_string())),
        }
    }
}

// ============================================================================
// ShellCommand
// ============================================================================

/// Context-switch and listing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// `.page [id]`
    Page(Option<TabId>),
    /// `.tab <id>`
    Tab(Option<TabId>),
    /// `.tabs`
    Tabs,
    /// `.clear`
    Clear,
    /// `.socket <id>`
    Socket(Option<SocketId>),
    /// `.sockets`
    Sockets,
    /// `.help`
    Help,
    /// `.exit`
    Exit,
    /// Anything else after a `.`.
    Unknown(String),
}

impl ShellCommand {
    /// Parses the text after the leading `.`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if an id is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let (keyword, arg) = match text.split_once(char::is_whitespace) {
            Some((keyword, arg)) => (keyword, arg.trim()),
            None => (text, ""),
        };
        let arg = (!arg.is_empty()).then_some(arg);

        Ok(match keyword {
            "page" => Self::Page(arg.map(TabId::new).transpose()?),
            "tab" => Self::Tab(arg.map(TabId::new).transpose()?),
            "tabs" => Self::Tabs,
            "clear" => Self::Clear,
            "socket" => Self::Socket(arg.map(SocketId::new).transpose()?),
            "sockets" => Self::Sockets,
            "help" => Self::Help,
            "exit" => Self::Exit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: &str) -> Option<TabId> {
        Some(TabId::new(id).expect("valid tab id"))
    }

    #[test]
    fn test_blank() {
        assert_eq!(Input::parse("").expect("parse"), Input::Blank);
        assert_eq!(Input::parse("  \t").expect("parse"), Input::Blank);
    }

    #[test]
    fn test_expression_kept_verbatim() {
        assert_eq!(
            Input::parse(" 1 + 1").expect("parse"),
            Input::Eval(" 1 + 1".to_string())
        );
    }

    #[test]
    fn test_leading_decimal_is_expression() {
        assert_eq!(
            Input::parse(".5+1").expect("parse"),
            Input::Eval(".5+1".to_string())
        );
        assert_eq!(
            Input::parse("  .25").expect("parse"),
            Input::Eval("  .25".to_string())
        );
    }

    #[test]
    fn test_commands() {
        let cases = [
            (".tab 7", ShellCommand::Tab(tab("7"))),
            (".tab", ShellCommand::Tab(None)),
            (".page", ShellCommand::Page(None)),
            (".page  12 ", ShellCommand::Page(tab("12"))),
            (".tabs", ShellCommand::Tabs),
            (".clear", ShellCommand::Clear),
            (".socket 5", ShellCommand::Socket(SocketId::new("5").ok())),
            (".socket", ShellCommand::Socket(None)),
            (".sockets", ShellCommand::Sockets),
            (".help", ShellCommand::Help),
            (".exit", ShellCommand::Exit),
            (".load x", ShellCommand::Unknown("load".to_string())),
        ];

        for (line, expected) in cases {
            assert_eq!(
                Input::parse(line).expect("parse"),
                Input::Command(expected),
                "line {line:?}"
            );
        }
    }

    #[test]
    fn test_bad_argument() {
        assert!(Input::parse(".tab 1 2").is_err());
        assert!(Input::parse(".socket a/b").is_err());
    }

    #[test]
    fn test_help_is_sorted() {
        let names: Vec<&str> = COMMAND_HELP.iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}

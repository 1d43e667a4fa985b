//! Interactive read-eval-print loop.
//!
//! The shell reads one line, evaluates it or runs the dot command it names,
//! prints the outcome and shows the prompt again. Each evaluation finishes
//! before the next line is read, which is what lets the transport keep a
//! single pending request.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `.tab <id>` | content-script context of tab `id` |
//! | `.page [id]` | page context of tab `id` or the selected tab |
//! | `.clear` | extension context |
//! | `.socket <id>` | reconnect to `beval.socket.<id>` |
//! | `.tabs` | list tabs |
//! | `.sockets` | list sockets |
//! | `.help` | list commands |
//! | `.exit` | leave the shell |
//!
//! A context command without its required id does nothing.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Input parsing |
//! | `config` | Configuration and builder |
//! | `reader` | Line input |

// ============================================================================
// Submodules
// ============================================================================

/// Input parsing.
pub mod command;

/// Configuration and builder.
pub mod config;

/// Line input.
pub mod reader;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{COMMAND_HELP, Input, ShellCommand};
pub use config::{ShellConfig, ShellConfigBuilder};
pub use reader::{LineReader, StdinReader};

// ============================================================================
// Imports
// ============================================================================

use std::io::{ErrorKind, Write};
use std::ops::ControlFlow;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::session::{Context, Session, Strategy};

// ============================================================================
// Prompt
// ============================================================================

/// Renders the prompt for `context`.
///
/// `brepl:0> `, `brepl:0>7> ` with a tab, `brepl:0>7>page> ` in page context.
#[must_use]
pub fn render_prompt(prefix: &str, context: &Context) -> String {
    let socket = context.socket_id();

    match (context.strategy(), context.tab_id()) {
        (Strategy::Page, Some(tab)) => format!("{prefix}:{socket}>{tab}>page> "),
        (_, Some(tab)) => format!("{prefix}:{socket}>{tab}> "),
        (_, None) => format!("{prefix}:{socket}> "),
    }
}

// ============================================================================
// Shell
// ============================================================================

/// Read-eval-print loop over a [`Session`].
pub struct Shell<R, W> {
    session: Session,
    reader: R,
    out: W,
    prompt_prefix: String,
}

impl<R, W> Shell<R, W>
where
    R: LineReader,
    W: Write,
{
    /// Creates a shell for `config`, reading from `reader` and printing to `out`.
    #[must_use]
    pub fn new(config: &ShellConfig, reader: R, out: W) -> Self {
        Self {
            session: Session::new(config.socket_dir.clone(), config.socket_id.clone()),
            reader,
            out,
            prompt_prefix: config.prompt_prefix.clone(),
        }
    }

    /// Returns the session.
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Connects to the configured socket and runs until end of input or `.exit`.
    ///
    /// Failures of individual lines are printed and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails. A
    /// line that is not valid UTF-8 is reported and skipped.
    pub async fn run(&mut self) -> Result<()> {
        if let Err(e) = self.session.connect().await {
            self.report(&e)?;
        }

        loop {
            let prompt = render_prompt(&self.prompt_prefix, self.session.context());

            let line = match self.reader.read_line(&prompt).await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("End of input");
                    break;
                }
                // Undecodable line; the reader has already consumed it.
                Err(Error::Io(e)) if e.kind() == ErrorKind::InvalidData => {
                    self.report(&Error::Io(e))?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if self.handle_line(&line).await?.is_break() {
                break;
            }
        }

        self.session.disconnect().await;
        Ok(())
    }

    /// Handles one input line.
    async fn handle_line(&mut self, line: &str) -> Result<ControlFlow<()>> {
        let input = match Input::parse(line) {
            Ok(input) => input,
            Err(e) => {
                self.report(&e)?;
                return Ok(ControlFlow::Continue(()));
            }
        };

        match input {
            Input::Blank => {}

            Input::Eval(expression) => {
                let outcome = self.session.eval(&expression).await;
                self.print_outcome(outcome)?;
            }

            Input::Command(command) => return self.handle_command(command).await,
        }

        Ok(ControlFlow::Continue(()))
    }

    async fn handle_command(&mut self, command: ShellCommand) -> Result<ControlFlow<()>> {
        match command {
            ShellCommand::Tab(id) => {
                self.session.select_tab(id);
            }

            ShellCommand::Page(id) => {
                self.session.select_page(id);
            }

            ShellCommand::Clear => self.session.clear(),

            ShellCommand::Socket(Some(id)) => {
                if let Err(e) = self.session.switch_socket(id).await {
                    self.report(&e)?;
                }
            }

            ShellCommand::Socket(None) => {}

            ShellCommand::Tabs => match self.session.list_tabs().await {
                Ok(tabs) => {
                    for tab in tabs {
                        writeln!(self.out, "{tab}")?;
                    }
                }
                Err(e) => self.report(&e)?,
            },

            ShellCommand::Sockets => match self.session.list_sockets().await {
                Ok(ids) => {
                    for id in ids {
                        writeln!(self.out, "{id}")?;
                    }
                }
                Err(e) => self.report(&e)?,
            },

            ShellCommand::Help => {
                for (name, help) in COMMAND_HELP {
                    writeln!(self.out, ".{name:<10}{help}")?;
                }
            }

            ShellCommand::Exit => return Ok(ControlFlow::Break(())),

            ShellCommand::Unknown(keyword) => {
                debug!(keyword, "Unknown command");
                writeln!(self.out, "Invalid REPL keyword")?;
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    fn print_outcome(&mut self, outcome: Result<Value>) -> Result<()> {
        match outcome {
            Ok(value) => writeln!(self.out, "{value:#}")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    /// Prints an error without ending the loop.
    fn report(&mut self, err: &Error) -> Result<()> {
        match err {
            Error::ConnectionMissing { .. } => writeln!(self.out, "{err}")?,
            _ => writeln!(self.out, "Error: {err}")?,
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

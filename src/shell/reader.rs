//! Line input for the shell.

// ============================================================================
// Imports
// ============================================================================

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::error::Result;

// ============================================================================
// LineReader
// ============================================================================

/// Source of shell input lines.
#[async_trait]
pub trait LineReader: Send {
    /// Shows `prompt` and waits for the next line.
    ///
    /// Returns `None` at end of input.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

// ============================================================================
// StdinReader
// ============================================================================

/// Reads lines from standard input, printing prompts to standard output.
pub struct StdinReader {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinReader {
    /// Creates a reader over the process's standard input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineReader for StdinReader {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }

        Ok(self.lines.next_line().await?)
    }
}

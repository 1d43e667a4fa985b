//! Shell configuration and builder.
//!
//! # Example
//!
//! ```no_run
//! use brepl::{ShellConfig, SocketId};
//!
//! # fn example() -> brepl::Result<()> {
//! let config = ShellConfig::builder()
//!     .socket_dir("/tmp")
//!     .socket_id(SocketId::new("1")?)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::identifiers::SocketId;

// ============================================================================
// Constants
// ============================================================================

/// Prompt prefix used when none is configured.
pub const DEFAULT_PROMPT_PREFIX: &str = "brepl";

// ============================================================================
// ShellConfig
// ============================================================================

/// Validated shell configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Directory holding the `beval.socket.*` files.
    pub socket_dir: PathBuf,
    /// Socket connected at startup.
    pub socket_id: SocketId,
    /// Text before the first `:` of every prompt.
    pub prompt_prefix: String,
}

impl ShellConfig {
    /// Creates a new configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ShellConfigBuilder {
        ShellConfigBuilder::new()
    }

    /// Returns the socket directory.
    #[inline]
    #[must_use]
    pub fn socket_dir(&self) -> &Path {
        &self.socket_dir
    }
}

// ============================================================================
// ShellConfigBuilder
// ============================================================================

/// Builder for configuring a [`ShellConfig`].
#[derive(Debug, Default, Clone)]
pub struct ShellConfigBuilder {
    socket_dir: Option<PathBuf>,
    socket_id: Option<SocketId>,
    prompt_prefix: Option<String>,
}

impl ShellConfigBuilder {
    /// Creates a builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory searched for sockets.
    ///
    /// Defaults to the system temporary directory.
    #[inline]
    #[must_use]
    pub fn socket_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.socket_dir = Some(dir.into());
        self
    }

    /// Sets the socket connected at startup.
    ///
    /// Defaults to `0`.
    #[inline]
    #[must_use]
    pub fn socket_id(mut self, id: SocketId) -> Self {
        self.socket_id = Some(id);
        self
    }

    /// Sets the prompt prefix.
    #[inline]
    #[must_use]
    pub fn prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt_prefix = Some(prefix.into());
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the socket directory is not a directory
    /// - [`Error::Config`] if the prompt prefix is empty
    pub fn build(self) -> Result<ShellConfig> {
        let socket_dir = self.socket_dir.unwrap_or_else(env::temp_dir);
        if !socket_dir.is_dir() {
            return Err(Error::config(format!(
                "socket directory {} does not exist or is not a directory",
                socket_dir.display()
            )));
        }

        let prompt_prefix = self
            .prompt_prefix
            .unwrap_or_else(|| DEFAULT_PROMPT_PREFIX.to_string());
        if prompt_prefix.trim().is_empty() {
            return Err(Error::config("prompt prefix must not be empty"));
        }

        Ok(ShellConfig {
            socket_dir,
            socket_id: self.socket_id.unwrap_or_default(),
            prompt_prefix,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::builder().build().expect("defaults");
        assert_eq!(config.socket_dir, env::temp_dir());
        assert_eq!(config.socket_id, SocketId::default());
        assert_eq!(config.prompt_prefix, DEFAULT_PROMPT_PREFIX);
    }

    #[test]
    fn test_custom_values() {
        let dir = TempDir::new().expect("tempdir");
        let config = ShellConfig::builder()
            .socket_dir(dir.path())
            .socket_id(SocketId::new("4").expect("valid id"))
            .prompt_prefix("dev")
            .build()
            .expect("valid config");

        assert_eq!(config.socket_dir(), dir.path());
        assert_eq!(config.socket_id.as_str(), "4");
        assert_eq!(config.prompt_prefix, "dev");
    }

    #[test]
    fn test_missing_dir_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let err = ShellConfig::builder()
            .socket_dir(dir.path().join("absent"))
            .build()
            .expect_err("missing dir");
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = ShellConfig::builder()
            .prompt_prefix(" ")
            .build()
            .expect_err("empty prefix");
        assert!(matches!(err, Error::Config { .. }));
    }
}

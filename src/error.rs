//! Error types for brepl.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use brepl::{Result, Session};
//!
//! async fn example(session: &mut Session) -> Result<()> {
//!     let value = session.eval("browser.runtime.id").await?;
//!     println!("{value}");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidArgument`] |
//! | Connection | [`Error::ConnectionMissing`], [`Error::NotConnected`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::RequestPending`], [`Error::Protocol`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::ChannelClosed`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when shell configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid argument to a shell command.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// The socket file does not exist.
    ///
    /// The native messaging host creates the socket; a missing file means
    /// it is not running.
    #[error(
        "Socket {} not found.\nBeval native messaging host does not seem to be running.",
        .path.display()
    )]
    ConnectionMissing {
        /// Path that was dialed.
        path: PathBuf,
    },

    /// No live connection although the socket file exists.
    #[error("Not connected to {}", .path.display())]
    NotConnected {
        /// Path of the socket that failed to connect earlier.
        path: PathBuf,
    },

    /// Remote end closed the socket.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// A request is already waiting for its response.
    #[error("A request is already in flight")]
    RequestPending,

    /// Protocol violation or unexpected response.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a connection missing error.
    #[inline]
    pub fn connection_missing(path: impl Into<PathBuf>) -> Self {
        Self::ConnectionMissing { path: path.into() }
    }

    /// Creates a not connected error.
    #[inline]
    pub fn not_connected(path: impl Into<PathBuf>) -> Self {
        Self::NotConnected { path: path.into() }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Classifies a failed connect to `path`.
    ///
    /// `NotFound` becomes [`Error::ConnectionMissing`]; anything else is
    /// kept as the raw IO error.
    pub fn from_connect(err: IoError, path: &Path) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::connection_missing(path),
            _ => Self::Io(err),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionMissing { .. } | Self::NotConnected { .. } | Self::ConnectionClosed
        )
    }

    /// Returns `true` if the remote sent something that could not be decoded.
    #[inline]
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Json(_) | Self::Protocol { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_missing_display() {
        let err = Error::connection_missing("/tmp/beval.socket.0");
        assert_eq!(
            err.to_string(),
            "Socket /tmp/beval.socket.0 not found.\n\
             Beval native messaging host does not seem to be running."
        );
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("socket dir missing");
        assert_eq!(err.to_string(), "Configuration error: socket dir missing");
    }

    #[test]
    fn test_from_connect_not_found() {
        let io_err = IoError::new(ErrorKind::NotFound, "no such file");
        let err = Error::from_connect(io_err, Path::new("/tmp/beval.socket.9"));
        assert!(matches!(err, Error::ConnectionMissing { ref path } if path.ends_with("beval.socket.9")));
    }

    #[test]
    fn test_from_connect_other() {
        let io_err = IoError::new(ErrorKind::PermissionDenied, "denied");
        let err = Error::from_connect(io_err, Path::new("/tmp/beval.socket.0"));
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(Error::not_connected("/tmp/x").is_connection_error());
        assert!(!Error::RequestPending.is_connection_error());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.is_decode_error());
    }
}

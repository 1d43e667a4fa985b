//! Type-safe identifiers for shell targets.
//!
//! Both ids are opaque text typed by the user. They are never interpreted
//! locally: a [`SocketId`] becomes a file name suffix and a [`TabId`] is
//! spliced into the evaluation wrapper as-is.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// ============================================================================
// SocketId
// ============================================================================

/// Identifies one `beval.socket.<id>` file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketId(String);

impl SocketId {
    /// Creates a socket id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the id is empty, contains
    /// whitespace, or contains a path separator.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(Error::invalid_argument(format!("invalid socket id: {id:?}")));
        }
        if id.contains('/') {
            return Err(Error::invalid_argument(format!(
                "socket id must not contain '/': {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// Returns the id as text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SocketId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ============================================================================
// TabId
// ============================================================================

/// Browser tab targeted by the content-script and page strategies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabId(String);

impl TabId {
    /// Creates a tab id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the id is empty or contains
    /// whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(Error::invalid_argument(format!("invalid tab id: {id:?}")));
        }
        Ok(Self(id))
    }

    /// Returns the id as text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TabId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_socket_id() {
        assert_eq!(SocketId::default().as_str(), "0");
    }

    #[test]
    fn test_socket_id_rejects_separator() {
        assert!(SocketId::new("../etc").is_err());
        assert!(SocketId::new("").is_err());
        assert!(SocketId::new("a b").is_err());
        assert!(SocketId::new("firefox-2").is_ok());
    }

    #[test]
    fn test_tab_id_parse() {
        let tab: TabId = "42".parse().expect("valid tab id");
        assert_eq!(tab.to_string(), "42");
        assert!("".parse::<TabId>().is_err());
    }
}

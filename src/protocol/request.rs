//! Request message type.
//!
//! A request is a single JSON value written to the socket with no
//! delimiter. The remote host evaluates it and answers with one JSON value
//! followed by `\n` (see [`super::frame`]).

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use crate::error::Result;

// ============================================================================
// Request
// ============================================================================

/// An evaluation request from the shell to the extension.
///
/// # Format
///
/// ```json
/// "browser.tabs.query({})"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Request {
    /// JavaScript source evaluated by the extension background page.
    pub expression: String,
}

impl Request {
    /// Creates a request for `expression`.
    #[inline]
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    /// Serializes the request into the bytes written to the socket.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_json_string() {
        let request = Request::new("1+1");
        let wire = request.to_wire().expect("serialize");
        assert_eq!(wire, br#""1+1""#);
    }

    #[test]
    fn test_request_has_no_delimiter() {
        let request = Request::new("a\nb");
        let wire = request.to_wire().expect("serialize");
        assert_eq!(wire, br#""a\nb""#);
        assert!(!wire.ends_with(b"\n"));
    }

    #[test]
    fn test_request_escapes_quotes() {
        let request = Request::new(r#"document.querySelector("a")"#);
        let json = String::from_utf8(request.to_wire().expect("serialize")).expect("utf8");
        let back: String = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, request.expression);
    }
}

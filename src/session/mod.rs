//! Evaluation session.
//!
//! A [`Session`] owns the [`Context`] and the single [`Connection`] and is
//! the only place either is mutated. It is driven from one task; nothing
//! here is shared.
//!
//! # Example
//!
//! ```no_run
//! use brepl::{Result, Session, SocketId, TabId};
//!
//! # async fn example() -> Result<()> {
//! let mut session = Session::new(std::env::temp_dir(), SocketId::default());
//! session.connect().await?;
//!
//! let id = session.eval("browser.runtime.id").await?;
//! println!("{id}");
//!
//! session.select_tab(Some(TabId::new("3")?));
//! let title = session.eval("document.title").await?;
//! println!("{title}");
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `context` | Socket/tab/strategy state machine |
//! | `strategy` | Payload builders for the three contexts |

// ============================================================================
// Submodules
// ============================================================================

/// Socket/tab/strategy state machine.
pub mod context;

/// Evaluation strategies.
pub mod strategy;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::Context;
pub use strategy::Strategy;

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::{SocketId, TabId};
use crate::protocol::Request;
use crate::transport::{self, Connection};

// ============================================================================
// Constants
// ============================================================================

/// Lists every open tab as `"<id> <title>"` strings.
pub const TAB_LIST_EXPRESSION: &str =
    "browser.tabs.query({}).then(tabs=>tabs.map(tab=>`${tab.id} ${tab.title}`))";

// ============================================================================
// Session
// ============================================================================

/// Context plus connection for one shell.
#[derive(Debug)]
pub struct Session {
    /// Directory holding the `beval.socket.*` files.
    socket_dir: PathBuf,
    /// Current evaluation context.
    context: Context,
    /// Live connection, if the last connect succeeded.
    connection: Option<Connection>,
}

impl Session {
    /// Creates a disconnected session on `socket_id`.
    #[must_use]
    pub fn new(socket_dir: impl Into<PathBuf>, socket_id: SocketId) -> Self {
        Self {
            socket_dir: socket_dir.into(),
            context: Context::new(socket_id),
            connection: None,
        }
    }

    /// Returns the socket directory.
    #[inline]
    #[must_use]
    pub fn socket_dir(&self) -> &Path {
        &self.socket_dir
    }

    /// Returns the current context.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Returns `true` if a connection is open.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Connects to the context's socket, replacing any open connection.
    ///
    /// On failure the session stays usable but disconnected.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionMissing`] if the socket file does not exist
    /// - [`Error::Io`] for any other connect failure
    pub async fn connect(&mut self) -> Result<()> {
        self.disconnect().await;

        let connection = Connection::connect(&self.socket_dir, self.context.socket_id()).await?;
        self.connection = Some(connection);
        Ok(())
    }

    /// Closes the open connection, if any.
    pub async fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close().await;
        }
    }

    /// Switches to socket `id`.
    ///
    /// The old connection is fully closed before the new one is dialed.
    /// The context moves to the new socket even if the dial fails.
    ///
    /// # Errors
    ///
    /// Same as [`Session::connect`].
    pub async fn switch_socket(&mut self, id: SocketId) -> Result<()> {
        self.disconnect().await;
        self.context.switch_socket(id);
        self.connect().await
    }

    /// Selects tab `id` for content-script evaluation.
    ///
    /// Returns `false` (and changes nothing) when `id` is `None`.
    #[inline]
    pub fn select_tab(&mut self, id: Option<TabId>) -> bool {
        self.context.select_tab(id)
    }

    /// Selects page evaluation in tab `id` or the selected tab.
    ///
    /// Returns `false` (and changes nothing) when no tab is known.
    #[inline]
    pub fn select_page(&mut self, id: Option<TabId>) -> bool {
        self.context.select_page(id)
    }

    /// Returns to extension evaluation.
    #[inline]
    pub fn clear(&mut self) {
        self.context.clear();
    }

    /// Evaluates `expression` in the current context.
    ///
    /// # Errors
    ///
    /// See [`Session::send`].
    pub async fn eval(&mut self, expression: &str) -> Result<Value> {
        let payload = self.context.build(expression);
        debug!(
            strategy = %self.context.strategy(),
            bytes = payload.len(),
            "Evaluating"
        );
        self.send(payload).await
    }

    /// Sends a raw payload and waits for its response.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionMissing`] / [`Error::NotConnected`] without a connection
    /// - any error of [`Connection::request`]
    pub async fn send(&mut self, payload: impl Into<String>) -> Result<Value> {
        let request = Request::new(payload);
        self.connection_mut()?.request(&request).await
    }

    /// Lists open tabs as `"<id> <title>"` lines.
    ///
    /// Always evaluated in the extension context; the current context is
    /// left as it is.
    ///
    /// # Errors
    ///
    /// - any error of [`Session::send`]
    /// - [`Error::Protocol`] if the result is not a list of strings
    pub async fn list_tabs(&mut self) -> Result<Vec<String>> {
        let payload = Strategy::Extension.build(TAB_LIST_EXPRESSION, &self.context);
        let value = self.send(payload).await?;

        let Value::Array(items) = value else {
            return Err(Error::protocol(format!("expected tab list, got {value}")));
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::String(line) => Ok(line),
                other => Err(Error::protocol(format!("expected tab line, got {other}"))),
            })
            .collect()
    }

    /// Lists the sockets present in the socket directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be read.
    pub async fn list_sockets(&self) -> Result<Vec<SocketId>> {
        transport::discover(&self.socket_dir).await
    }

    fn connection_mut(&mut self) -> Result<&mut Connection> {
        match self.connection {
            Some(ref mut connection) => Ok(connection),
            None => {
                let path = transport::socket_path(&self.socket_dir, self.context.socket_id());
                if path.exists() {
                    Err(Error::not_connected(path))
                } else {
                    Err(Error::connection_missing(path))
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use crate::transport::testing;

    fn socket(id: &str) -> SocketId {
        SocketId::new(id).expect("valid socket id")
    }

    #[tokio::test]
    async fn test_eval_extension_echo() {
        let dir = TempDir::new().expect("tempdir");
        let host = testing::echo(testing::bind(dir.path(), "0"));

        let mut session = Session::new(dir.path(), SocketId::default());
        session.connect().await.expect("connect");

        let value = session.eval("1+1").await.expect("eval");
        assert_eq!(value, json!({"echo": "1+1"}));

        session.disconnect().await;
        assert_eq!(host.await.expect("host"), vec![json!("1+1")]);
    }

    #[tokio::test]
    async fn test_eval_in_tab_sends_wrapper() {
        let dir = TempDir::new().expect("tempdir");
        let host = testing::echo(testing::bind(dir.path(), "0"));

        let mut session = Session::new(dir.path(), SocketId::default());
        session.connect().await.expect("connect");
        assert!(session.select_tab(Some(TabId::new("7").expect("valid tab id"))));

        let value = session.eval("document.title").await.expect("eval");
        let sent = value["echo"].as_str().expect("string payload");
        assert!(sent.starts_with("browser.tabs.executeScript(7, {"));
        assert!(sent.contains("code:`document.title`"));

        session.disconnect().await;
        host.await.expect("host");
    }

    #[tokio::test]
    async fn test_missing_socket_is_reported_every_time() {
        let dir = TempDir::new().expect("tempdir");
        let mut session = Session::new(dir.path(), SocketId::default());

        let err = session.connect().await.expect_err("no socket");
        assert!(matches!(err, Error::ConnectionMissing { .. }));
        assert!(!session.is_connected());

        let err = session.eval("1").await.expect_err("still no socket");
        assert!(matches!(err, Error::ConnectionMissing { .. }));
    }

    #[tokio::test]
    async fn test_list_tabs_ignores_context() {
        let dir = TempDir::new().expect("tempdir");
        let host = testing::serve(testing::bind(dir.path(), "0"), |_| {
            json!(["1 Example Domain", "2 New Tab"])
        });

        let mut session = Session::new(dir.path(), SocketId::default());
        session.connect().await.expect("connect");
        session.select_page(Some(TabId::new("2").expect("valid tab id")));
        let before = session.context().clone();

        let tabs = session.list_tabs().await.expect("tabs");
        assert_eq!(tabs, vec!["1 Example Domain", "2 New Tab"]);
        assert_eq!(session.context(), &before);

        session.disconnect().await;
        assert_eq!(host.await.expect("host"), vec![json!(TAB_LIST_EXPRESSION)]);
    }

    #[tokio::test]
    async fn test_list_tabs_rejects_non_list() {
        let dir = TempDir::new().expect("tempdir");
        let _host = testing::serve(testing::bind(dir.path(), "0"), |_| json!({"nope": 1}));

        let mut session = Session::new(dir.path(), SocketId::default());
        session.connect().await.expect("connect");

        let err = session.list_tabs().await.expect_err("not a list");
        assert!(matches!(err, Error::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_switch_socket_closes_old_connection_first() {
        let dir = TempDir::new().expect("tempdir");
        let old_listener = testing::bind(dir.path(), "0");
        let new_listener = testing::bind(dir.path(), "5");

        let mut session = Session::new(dir.path(), SocketId::default());
        session.connect().await.expect("connect 0");
        let (mut old_stream, _) = old_listener.accept().await.expect("accept 0");

        session.switch_socket(socket("5")).await.expect("connect 5");

        // The old peer sees end of stream once the switch returns.
        let mut buf = [0u8; 16];
        let n = old_stream.read(&mut buf).await.expect("read old");
        assert_eq!(n, 0);

        // A late frame from the old host must not reach the new connection.
        let _ = old_stream.write_all(b"\"stale\"\n").await;
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        let host = testing::echo(new_listener);
        let value = session.eval("1").await.expect("eval on 5");
        assert_ne!(value, json!("stale"));
        let sent = value["echo"].as_str().expect("string payload");
        assert!(sent.starts_with("browser.tabs.executeScript(null, {"));

        assert_eq!(session.context().socket_id().as_str(), "5");
        assert_eq!(session.context().strategy(), Strategy::ContentScript);
        assert_eq!(session.context().tab_id(), None);

        session.disconnect().await;
        host.await.expect("host");
    }

    #[tokio::test]
    async fn test_switch_to_missing_socket_keeps_context() {
        let dir = TempDir::new().expect("tempdir");
        let mut session = Session::new(dir.path(), SocketId::default());

        let err = session.switch_socket(socket("9")).await.expect_err("missing");
        assert!(matches!(err, Error::ConnectionMissing { ref path } if path.ends_with("beval.socket.9")));
        assert_eq!(session.context().socket_id().as_str(), "9");
    }

    #[tokio::test]
    async fn test_list_sockets() {
        let dir = TempDir::new().expect("tempdir");
        let _zero = testing::bind(dir.path(), "0");
        let _three = testing::bind(dir.path(), "3");

        let session = Session::new(dir.path(), SocketId::default());
        let ids = session.list_sockets().await.expect("list");
        assert_eq!(ids, vec![socket("0"), socket("3")]);
    }
}

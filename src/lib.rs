//! brepl - Interactive JavaScript shell for a browser extension.
//!
//! This library evaluates JavaScript expressions inside a running browser
//! extension, reached through the beval native messaging host's Unix socket.
//!
//! # Architecture
//!
//! The shell follows a client-host model:
//!
//! - **Shell (Rust)**: Reads expressions, wraps them for the chosen context
//! - **Host (Native messaging)**: Listens on `<tmp>/beval.socket.<id>`,
//!   relays each request to the extension and writes back the result
//!
//! Key design principles:
//!
//! - One [`Session`] owns the context and the only socket connection
//! - One request in flight at a time; no ids on the wire
//! - Responses are newline-terminated JSON, requests are bare JSON
//! - Three evaluation contexts: extension, content script, page
//!
//! # Quick Start
//!
//! ```no_run
//! use brepl::{Result, Session, SocketId};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let mut session = Session::new(std::env::temp_dir(), SocketId::default());
//!     session.connect().await?;
//!
//!     for tab in session.list_tabs().await? {
//!         println!("{tab}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Socket and tab id wrappers |
//! | [`protocol`] | Request type and response framing |
//! | [`session`] | Context state and evaluation strategies |
//! | [`shell`] | Read-eval-print loop and configuration |
//! | [`transport`] | Unix socket connection |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for sockets and tabs.
pub mod identifiers;

/// Wire protocol types.
///
/// Request serialization and newline framing of responses.
pub mod protocol;

/// Evaluation session: context, strategies, connection ownership.
pub mod session;

/// Interactive shell.
pub mod shell;

/// Unix socket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{SocketId, TabId};

// Session types
pub use session::{Context, Session, Strategy};

// Shell types
pub use shell::{LineReader, Shell, ShellConfig, ShellConfigBuilder, StdinReader};

// Transport types
pub use transport::Connection;

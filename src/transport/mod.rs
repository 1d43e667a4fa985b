//! Unix socket transport layer.
//!
//! This module handles communication between the shell and the beval
//! native messaging host, which relays each request to the extension.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Shell (Rust)   │                              │  Native host    │
//! │                 │      Unix domain socket      │  ↕ Extension    │
//! │  Connection     │◄────────────────────────────►│  (Background)   │
//! │                 │   <tmp>/beval.socket.<id>    │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::connect` - Dial `beval.socket.<id>`
//! 2. `Connection::request` - Write one request, await one response
//! 3. `Connection::close` - Stop the reader, shut down the socket
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Socket connection, reader loop, correlation |
//! | `socket` | Socket paths and discovery |

// ============================================================================
// Submodules
// ============================================================================

/// Socket connection and reader loop.
pub mod connection;

/// Socket addressing and discovery.
pub mod socket;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::Connection;
pub use socket::{SOCKET_PREFIX, discover, socket_path};

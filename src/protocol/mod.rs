//! Wire protocol message types.
//!
//! This module defines the message format spoken over the beval socket.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Framing |
//! |---------|-----------|---------|
//! | `Request` | Shell → Host | one JSON value, no delimiter |
//! | Response | Host → Shell | one JSON value, then `\n` |
//!
//! Exactly one request is outstanding at a time, so responses carry no
//! correlation id: the next complete frame answers the last request.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `frame` | Newline reassembly of inbound chunks |
//! | `request` | Request type |

// ============================================================================
// Submodules
// ============================================================================

/// Newline-delimited response reassembly.
pub mod frame;

/// Request message type.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use frame::{FRAME_DELIMITER, FrameDecoder};
pub use request::Request;

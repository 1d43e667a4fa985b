//! Response reassembly.
//!
//! The remote host terminates every response with a newline. Bytes arrive
//! in arbitrary chunks; [`FrameDecoder`] accumulates them and yields one
//! decoded value per complete line.
//!
//! # Invariant
//!
//! The buffer is non-empty only while a response is being assembled. When
//! the accumulated bytes end with `\n` every frame has been dispatched and
//! the buffer is empty again. Bytes after the last newline are kept as the
//! start of the next frame.
//!
//! Every newline ends a frame, so the host must write each response as
//! single-line JSON. Pretty-printed output splits into several invalid
//! frames.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::trace;

use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Frame terminator.
pub const FRAME_DELIMITER: u8 = b'\n';

// ============================================================================
// FrameDecoder
// ============================================================================

/// Accumulates inbound chunks into newline-delimited JSON frames.
///
/// Responses must be single-line JSON: a newline inside a response ends
/// the frame early.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes received since the last complete frame.
    buffer: Vec<u8>,
    /// Length of the buffer prefix already searched for a delimiter.
    scanned: usize,
}

impl FrameDecoder {
    /// Creates an empty decoder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and decodes every frame it completes, in order.
    ///
    /// A frame that is not valid JSON yields an `Err` in its slot; the
    /// frames around it are unaffected. Whitespace-only lines are skipped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<Value>> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut start = 0;
        let mut cursor = self.scanned;

        // Only bytes past `scanned` can hold a delimiter not yet seen.
        while let Some(offset) = self.buffer[cursor..]
            .iter()
            .position(|&b| b == FRAME_DELIMITER)
        {
            let end = cursor + offset;
            let body = &self.buffer[start..end];
            start = end + 1;
            cursor = start;

            if body.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            trace!(bytes = body.len(), "Frame complete");
            frames.push(serde_json::from_slice(body).map_err(Into::into));
        }

        if start > 0 {
            self.buffer.drain(..start);
        }
        self.scanned = self.buffer.len();

        frames
    }

    /// Returns `true` if no partial frame is buffered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the number of buffered bytes of the partial frame.
    #[inline]
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Discards any partial frame.
    #[inline]
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scanned = 0;
    }
}

// ============================================================================
// Tests
// ============================================================================

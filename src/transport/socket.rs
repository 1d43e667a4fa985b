//! Socket addressing and discovery.
//!
//! The native messaging host listens on `<dir>/beval.socket.<id>`, one
//! socket per browser profile. Discovery lists `<dir>` and keeps the
//! entries carrying that prefix.

// ============================================================================
// Imports
// ============================================================================

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, trace};

use crate::error::Result;
use crate::identifiers::SocketId;

// ============================================================================
// Constants
// ============================================================================

/// File name prefix shared by every beval socket.
pub const SOCKET_PREFIX: &str = "beval.socket.";

// ============================================================================
// Functions
// ============================================================================

/// Returns the filesystem path of socket `id` inside `dir`.
#[inline]
#[must_use]
pub fn socket_path(dir: &Path, id: &SocketId) -> PathBuf {
    dir.join(format!("{SOCKET_PREFIX}{id}"))
}

/// Lists the ids of all sockets present in `dir`.
///
/// Numeric ids sort numerically and come before other ids.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the directory cannot be read.
pub async fn discover(dir: &Path) -> Result<Vec<SocketId>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut ids = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(suffix) = name.strip_prefix(SOCKET_PREFIX) else {
            continue;
        };

        match SocketId::new(suffix) {
            Ok(id) => ids.push(id),
            Err(_) => trace!(name, "Skipping unusable socket name"),
        }
    }

    ids.sort_by(compare_ids);
    debug!(dir = %dir.display(), count = ids.len(), "Discovered sockets");

    Ok(ids)
}

fn compare_ids(a: &SocketId, b: &SocketId) -> Ordering {
    match (a.as_str().parse::<u64>(), b.as_str().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Unix socket connection and reader loop.
//!
//! This module handles the socket to the native messaging host, including
//! response reassembly and request/response correlation.
//!
//! # Reader Loop
//!
//! The connection spawns a tokio task that:
//!
//! - Reads byte chunks from the socket
//! - Feeds them through a [`FrameDecoder`]
//! - Hands each complete frame to the waiting request, if any
//!
//! # Correlation
//!
//! There are no request ids. The mailbox holds at most one waiting sender;
//! the next complete frame is delivered to it and the slot is emptied
//! before delivery, so a late frame can never reach a finished request.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::SocketId;
use crate::protocol::{FrameDecoder, Request};

use super::socket::socket_path;

// ============================================================================
// Constants
// ============================================================================

/// Size of a single socket read.
const READ_CHUNK_SIZE: usize = 8 * 1024;

// ============================================================================
// Types
// ============================================================================

/// Sender half handed the next complete response.
type Responder = oneshot::Sender<Result<Value>>;

/// Boxed write half of the socket.
type Writer = Box<dyn AsyncWrite + Send + Unpin>;

// ============================================================================
// Mailbox
// ============================================================================

/// Single-slot correlation state shared with the reader task.
#[derive(Default)]
struct Mailbox {
    /// The request waiting for its response.
    pending: Option<Responder>,
    /// Set once the reader loop has exited.
    closed: bool,
}

impl Mailbox {
    /// Returns `true` if a live request is waiting.
    fn is_busy(&self) -> bool {
        self.pending.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Marks the mailbox closed and fails the waiting request, if any.
    fn close(&mut self, reason: Error) {
        self.closed = true;
        if let Some(tx) = self.pending.take() {
            let _ = tx.send(Err(reason));
        }
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Connection to one beval socket.
///
/// Owns the write half directly and the read half through the spawned
/// reader task. Dropping or [closing](Connection::close) the connection
/// aborts the reader, so no data read from this socket is delivered after
/// it is gone.
pub struct Connection {
    /// Socket this connection was opened on.
    socket_id: SocketId,
    /// Filesystem path of the socket.
    path: PathBuf,
    /// Write half.
    writer: Writer,
    /// Correlation slot (shared with reader task).
    mailbox: Arc<Mutex<Mailbox>>,
    /// Reader task handle.
    reader: JoinHandle<()>,
}

impl Connection {
    /// Connects to socket `id` inside `dir`.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionMissing`] if the socket file does not exist
    /// - [`Error::Io`] for any other connect failure
    pub async fn connect(dir: &Path, id: &SocketId) -> Result<Self> {
        let path = socket_path(dir, id);

        let stream = UnixStream::connect(&path)
            .await
            .map_err(|e| Error::from_connect(e, &path))?;

        debug!(socket_id = %id, path = %path.display(), "Socket connected");

        Ok(Self::from_stream(stream, id.clone(), path))
    }

    /// Creates a connection over any byte stream.
    ///
    /// Spawns the reader task internally.
    pub(crate) fn from_stream<S>(stream: S, socket_id: SocketId, path: PathBuf) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let mailbox = Arc::new(Mutex::new(Mailbox::default()));

        let reader = tokio::spawn(Self::run_reader(
            read_half,
            Arc::clone(&mailbox),
            socket_id.clone(),
        ));

        Self {
            socket_id,
            path,
            writer: Box::new(write_half),
            mailbox,
            reader,
        }
    }

    /// Returns the socket id.
    #[inline]
    #[must_use]
    pub fn socket_id(&self) -> &SocketId {
        &self.socket_id
    }

    /// Returns the socket path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a request is waiting for its response.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.mailbox.lock().is_busy()
    }

    /// Returns `true` once the remote end has hung up.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.mailbox.lock().closed
    }

    /// Sends a request and waits for the next complete response.
    ///
    /// There is no timeout: a host that never answers leaves the caller
    /// waiting.
    ///
    /// # Errors
    ///
    /// - [`Error::RequestPending`] if another request is still waiting
    /// - [`Error::ConnectionClosed`] if the remote end hung up
    /// - [`Error::Io`] if the write or a later read fails
    /// - [`Error::Json`] if the response frame is not valid JSON
    pub async fn request(&mut self, request: &Request) -> Result<Value> {
        let wire = request.to_wire()?;
        let (tx, rx) = oneshot::channel();

        // Register before writing so a fast reply cannot slip past.
        {
            let mut mailbox = self.mailbox.lock();
            if mailbox.closed {
                return Err(Error::ConnectionClosed);
            }
            if mailbox.is_busy() {
                warn!(socket_id = %self.socket_id, "Request already in flight");
                return Err(Error::RequestPending);
            }
            mailbox.pending = Some(tx);
        }

        if let Err(e) = self.write(&wire).await {
            self.mailbox.lock().pending = None;
            return Err(e);
        }

        trace!(socket_id = %self.socket_id, bytes = wire.len(), "Request sent");

        rx.await?
    }

    /// Closes the connection.
    ///
    /// The reader task is aborted and joined before the write half is shut
    /// down, so nothing from this socket is observed afterwards.
    pub async fn close(mut self) {
        self.reader.abort();
        let _ = (&mut self.reader).await;

        if let Err(e) = self.writer.shutdown().await {
            debug!(socket_id = %self.socket_id, error = %e, "Shutdown after close failed");
        }

        debug!(socket_id = %self.socket_id, "Socket closed");
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Reader loop that reassembles and dispatches responses.
    async fn run_reader<R>(mut reader: R, mailbox: Arc<Mutex<Mailbox>>, socket_id: SocketId)
    where
        R: AsyncRead + Unpin,
    {
        let mut decoder = FrameDecoder::new();
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];

        let reason = loop {
            match reader.read(&mut chunk).await {
                Ok(0) => {
                    debug!(%socket_id, "Socket closed by remote");
                    break Error::ConnectionClosed;
                }

                Ok(n) => {
                    trace!(%socket_id, bytes = n, "Chunk received");
                    for frame in decoder.push(&chunk[..n]) {
                        Self::dispatch(frame, &mailbox, &socket_id);
                    }
                }

                Err(e) => {
                    warn!(%socket_id, error = %e, "Socket read failed");
                    break Error::Io(e);
                }
            }
        };

        if !decoder.is_empty() {
            debug!(%socket_id, bytes = decoder.pending_len(), "Dropping partial frame");
        }

        mailbox.lock().close(reason);

        debug!(%socket_id, "Reader terminated");
    }

    /// Delivers one frame to the waiting request.
    fn dispatch(frame: Result<Value>, mailbox: &Arc<Mutex<Mailbox>>, socket_id: &SocketId) {
        let tx = mailbox.lock().pending.take();

        match tx {
            Some(tx) => {
                if tx.send(frame).is_err() {
                    debug!(%socket_id, "Requester went away before response");
                }
            }
            None => warn!(%socket_id, "Response with no pending request"),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("socket_id", &self.socket_id)
            .field("path", &self.path)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

// ============================================================================
// Tests
// ============================================================================

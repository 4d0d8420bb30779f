//! Consumer side of the gesture socket.
//!
//! The UI process owns the socket: it binds the path, accepts one connection
//! per gesture, and reads at most [`MAX_MESSAGE_BYTES`] from it.  This module
//! implements that contract for the `liveview-event-tap` diagnostic binary
//! and for tests that need a real endpoint for the forwarder to talk to.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::net::UnixListener;
use tokio::time::timeout;
use tracing::{debug, warn};

use liveview_core::protocol::{decode_message, IpcMessage, WireError, MAX_MESSAGE_BYTES};

/// Errors raised by [`EventListener`].
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("could not bind {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("socket I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("undecodable message: {0}")]
    Decode(#[from] WireError),

    /// The peer connected but did not finish sending in time.
    #[error("read timed out after {after:?}")]
    Timeout { after: Duration },
}

/// How long a connected peer has to send its message and close.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// A bound gesture socket.  The socket file is removed on drop.
pub struct EventListener {
    path: PathBuf,
    listener: UnixListener,
    read_timeout: Duration,
}

impl EventListener {
    /// Binds `path`, replacing a stale socket file left by an earlier run.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self, ListenerError> {
        let path = path.into();
        if path.exists() {
            debug!("removing stale socket {}", path.display());
            let _ = std::fs::remove_file(&path);
        }
        let listener = UnixListener::bind(&path).map_err(|source| ListenerError::Bind {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            listener,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    /// Replaces the per-connection read timeout.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Waits for the next connection and decodes the message it carries.
    ///
    /// Bytes past [`MAX_MESSAGE_BYTES`] are never read.  A peer that keeps
    /// the connection open without finishing is dropped after the read
    /// timeout.
    pub async fn accept_one(&self) -> Result<IpcMessage, ListenerError> {
        let (stream, _) = self.listener.accept().await?;
        let mut buf = Vec::with_capacity(256);
        let mut limited = stream.take(MAX_MESSAGE_BYTES as u64);
        let outcome = timeout(self.read_timeout, limited.read_to_end(&mut buf)).await;
        match outcome {
            Ok(Ok(_)) => Ok(decode_message(&buf)?),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(ListenerError::Timeout {
                after: self.read_timeout,
            }),
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("could not remove {}: {e}", self.path.display());
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

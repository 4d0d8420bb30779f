//! Unix-socket delivery of gestures to the UI process.
//!
//! # Delivery model
//!
//! Every gesture travels on its own short-lived connection:
//!
//! ```text
//! connect(socket_path) → write one JSON message → shutdown → drop
//! ```
//!
//! The UI reads each connection to end-of-stream, so the end of the
//! connection is the message boundary.  There is no framing, no reply, and no
//! retry.  A missing or hung consumer costs one bounded wait per gesture and
//! never stalls the viewer's session.
//!
//! # Portability note
//!
//! Unix domain sockets are only available on Unix-like systems, which is
//! where the UI process runs.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tokio::time::timeout;
use tracing::trace;

use liveview_core::{encode_message, GestureEvent};

use crate::application::{EventSink, ForwardError};

/// Delivers gestures to the UI process over its Unix-domain socket.
#[derive(Debug, Clone)]
pub struct EventForwarder {
    socket_path: PathBuf,
    timeout: Duration,
}

impl EventForwarder {
    /// Creates a forwarder for `socket_path`.
    ///
    /// Nothing is opened until the first [`EventSink::forward`] call; the
    /// socket may appear and disappear while the bridge runs.
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    /// The socket this forwarder delivers to.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    async fn deliver(&self, payload: &[u8]) -> std::io::Result<()> {
        let mut stream = UnixStream::connect(&self.socket_path).await?;
        stream.write_all(payload).await?;
        stream.shutdown().await
    }
}

#[async_trait]
impl EventSink for EventForwarder {
    async fn forward(&self, event: GestureEvent) -> Result<(), ForwardError> {
        let payload = encode_message(&event, SystemTime::now()).map_err(|e| {
            ForwardError::DeliveryFailed {
                cause: e.to_string(),
            }
        })?;

        match timeout(self.timeout, self.deliver(&payload)).await {
            Ok(Ok(())) => {
                trace!(
                    "wrote {} bytes to {}",
                    payload.len(),
                    self.socket_path.display()
                );
                Ok(())
            }
            Ok(Err(e)) => Err(ForwardError::DeliveryFailed {
                cause: format!("{}: {e}", self.socket_path.display()),
            }),
            Err(_) => Err(ForwardError::Timeout {
                after: self.timeout,
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! WebSocket server: accept loop and per-viewer session handling.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from viewers.
//! 3. Upgrading each connection to a WebSocket session.
//! 4. Giving every session its own [`GestureRelay`] and a unique viewer id.
//! 5. Dispatching each JSON message in arrival order and writing the replies.
//! 6. Stopping the accept loop when the `running` flag is cleared.
//!
//! # Ordering
//!
//! A session reads, dispatches, and replies to one message at a time.  The
//! next message is not read until the previous one, including its gesture
//! delivery, has finished.  This keeps a viewer's samples in order without
//! any locking around the classifier.
//!
//! # Scalability
//!
//! Each viewer session runs in its own Tokio task.  The accept loop never
//! blocks on a session: it accepts a connection and immediately spawns a task
//! for it before accepting the next one.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use liveview_core::GestureThresholds;

use crate::application::{EventSink, GestureRelay};
use crate::domain::config::BridgeConfig;
use crate::domain::messages::{BridgeToViewerMsg, ViewerToBridgeMsg};
use crate::infrastructure::event_forwarder::EventForwarder;
use crate::infrastructure::frame_store::{FrameStore, FrameStoreError};
use crate::infrastructure::startup::run_startup;

/// How long one `accept()` may block before the shutdown flag is re-checked.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// A bound viewer endpoint, ready to [`run`](ViewerServer::run).
pub struct ViewerServer {
    listener: TcpListener,
    thresholds: GestureThresholds,
    sink: Arc<dyn EventSink>,
    frames: Arc<FrameStore>,
}

impl ViewerServer {
    /// Binds `config.bind_addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound (e.g., the port is
    /// already in use or the process lacks permission to bind).
    pub async fn bind(
        config: &BridgeConfig,
        sink: Arc<dyn EventSink>,
        frames: FrameStore,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .with_context(|| format!("failed to bind viewer listener on {}", config.bind_addr))?;

        Ok(Self {
            listener,
            thresholds: config.gestures.clone(),
            sink,
            frames: Arc::new(frames),
        })
    }

    /// The address actually bound; useful when binding port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until `running` is set to `false`.
    ///
    /// Sessions already in progress are not interrupted; they end when their
    /// viewer disconnects or the runtime shuts down.
    pub async fn run(self, running: Arc<AtomicBool>) -> anyhow::Result<()> {
        if let Ok(addr) = self.local_addr() {
            info!("viewer endpoint listening on {addr}");
        }

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set; stopping accept loop");
                break;
            }

            // Short timeout so the flag is checked even when nobody connects.
            match timeout(ACCEPT_POLL, self.listener.accept()).await {
                Ok(Ok((stream, peer_addr))) => {
                    let viewer_id = Uuid::new_v4().to_string();
                    info!("viewer {viewer_id} connected from {peer_addr}");
                    let relay =
                        GestureRelay::new(&viewer_id, self.thresholds.clone(), Arc::clone(&self.sink));
                    let frames = Arc::clone(&self.frames);

                    tokio::spawn(async move {
                        handle_viewer_session(stream, viewer_id, relay, frames).await;
                    });
                }
                Ok(Err(e)) => {
                    // Transient (e.g. out of file descriptors); keep serving.
                    error!("accept error: {e}");
                }
                Err(_) => {}
            }
        }

        Ok(())
    }
}

/// Runs startup, binds the viewer endpoint, and serves until `running` is
/// cleared.
///
/// # Errors
///
/// Returns an error if the viewer listener cannot be bound.
pub async fn run_server(config: BridgeConfig, running: Arc<AtomicBool>) -> anyhow::Result<()> {
    let frames = FrameStore::new(
        &config.frame_dir,
        &config.frame_prefix,
        &config.frame_extension,
    );
    run_startup(&config, &frames).await;

    let sink: Arc<dyn EventSink> = Arc::new(EventForwarder::new(
        &config.socket_path,
        config.forward_timeout,
    ));
    info!(
        "forwarding gestures to {} (timeout {:?})",
        config.socket_path.display(),
        config.forward_timeout
    );

    ViewerServer::bind(&config, sink, frames)
        .await?
        .run(running)
        .await
}

// ── Per-session handler ───────────────────────────────────────────────────────

async fn handle_viewer_session(
    stream: TcpStream,
    viewer_id: String,
    mut relay: GestureRelay,
    frames: Arc<FrameStore>,
) {
    let result = run_session(stream, &viewer_id, &mut relay, &frames).await;
    relay.end().await;
    match result {
        Ok(()) => info!("viewer {viewer_id} disconnected"),
        Err(e) => warn!("viewer {viewer_id} closed with error: {e:#}"),
    }
}

async fn run_session(
    stream: TcpStream,
    viewer_id: &str,
    relay: &mut GestureRelay,
    frames: &FrameStore,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream)
        .await
        .with_context(|| format!("WebSocket handshake failed for viewer {viewer_id}"))?;
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    loop {
        let ws_msg = match ws_rx.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) | None => break,
            Some(Err(e)) => return Err(e).context("WebSocket read failed"),
        };

        let replies = match ws_msg {
            WsMessage::Text(text) => dispatch(relay, frames, &text).await,
            WsMessage::Binary(_) => {
                warn!("viewer {viewer_id}: unexpected binary frame");
                vec![reply(BridgeToViewerMsg::Rejected {
                    reason: "binary frames are not accepted".to_string(),
                })]
            }
            WsMessage::Close(_) => break,
            // Ping replies are queued by tungstenite itself.
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => continue,
        };

        for message in replies {
            ws_tx
                .send(message)
                .await
                .context("WebSocket send failed")?;
        }
    }

    Ok(())
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Handles one text message and returns the frames to send back.
async fn dispatch(relay: &mut GestureRelay, frames: &FrameStore, text: &str) -> Vec<WsMessage> {
    let msg: ViewerToBridgeMsg = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            warn!("invalid JSON from viewer: {e}");
            return vec![reply(BridgeToViewerMsg::Rejected {
                reason: format!("invalid message: {e}"),
            })];
        }
    };
    debug!("viewer → bridge: {}", msg.type_name());

    match msg {
        ViewerToBridgeMsg::Sample { sample, surface } => {
            let ack = match relay.handle_sample(sample, surface).await {
                Ok(outcome) => BridgeToViewerMsg::SampleAck {
                    event: outcome.event.map(|e| e.type_name().to_string()),
                    delivered: outcome.delivered,
                },
                Err(e) => BridgeToViewerMsg::Rejected {
                    reason: e.to_string(),
                },
            };
            vec![reply(ack)]
        }

        ViewerToBridgeMsg::Batch { samples, surface } => {
            let outcome = relay.handle_batch(samples, surface).await;
            vec![reply(BridgeToViewerMsg::BatchAck {
                accepted: outcome.accepted,
                rejected: outcome.rejected,
                delivered: outcome.delivered,
            })]
        }

        ViewerToBridgeMsg::Touch { x, y, surface } => {
            let ack = match relay.handle_legacy_touch(x, y, surface).await {
                Ok(outcome) => BridgeToViewerMsg::SampleAck {
                    event: outcome.event.map(|e| e.type_name().to_string()),
                    delivered: outcome.delivered,
                },
                Err(e) => BridgeToViewerMsg::Rejected {
                    reason: e.to_string(),
                },
            };
            vec![reply(ack)]
        }

        ViewerToBridgeMsg::FetchFrame => match frames.fetch_newest().await {
            Ok(frame) => {
                let header = BridgeToViewerMsg::Frame {
                    name: frame.name,
                    size: frame.bytes.len() as u64,
                };
                vec![reply(header), WsMessage::Binary(frame.bytes)]
            }
            Err(FrameStoreError::NotFound { .. }) => vec![reply(BridgeToViewerMsg::NoFrame)],
            Err(e) => {
                error!("{e}");
                vec![reply(BridgeToViewerMsg::Rejected {
                    reason: "frame unavailable".to_string(),
                })]
            }
        },
    }
}

/// Serializes a reply into a text frame.
fn reply(msg: BridgeToViewerMsg) -> WsMessage {
    match serde_json::to_string(&msg) {
        Ok(json) => WsMessage::Text(json),
        Err(e) => {
            // Only reachable if a reply type stops being plain data.
            error!("JSON serialization error: {e}");
            WsMessage::Text(r#"{"type":"Rejected","reason":"internal error"}"#.to_string())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

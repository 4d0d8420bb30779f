//! liveview-bridge library crate.
//!
//! This crate lets a remote viewer watch the most recent rendered frame of a
//! locally running UI and interact with it.  Pointer and touch samples from
//! the viewer are classified into gestures and relayed to the UI process
//! over a local Unix socket.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Viewer (JSON over WebSocket)
//!         ↕
//! [liveview-bridge]
//!   ├── domain/           Pure types: viewer message enums, BridgeConfig
//!   ├── application/      GestureRelay: classify samples, hand gestures to an EventSink
//!   └── infrastructure/
//!         ├── ws_server/       WebSocket accept loop (tokio-tungstenite)
//!         ├── event_forwarder/ One Unix-socket connection per gesture
//!         ├── event_listener/  Consumer side of the same socket
//!         ├── frame_store/     Newest-frame lookup and stale-frame purge
//!         ├── startup/         Link readiness wait, run once at boot
//!         └── config_file/     Optional TOML threshold file
//!         ↕
//! UI process (one JSON message per Unix-socket connection)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `liveview-core`; it talks to the
//!   outside world only through the [`application::EventSink`] trait.
//! - `infrastructure` depends on all other layers plus `tokio` and `tungstenite`.

/// Domain layer: pure configuration and message types (no I/O).
pub mod domain;

/// Application layer: sample classification and gesture delivery.
pub mod application;

/// Infrastructure layer: sockets, files, and processes.
pub mod infrastructure;

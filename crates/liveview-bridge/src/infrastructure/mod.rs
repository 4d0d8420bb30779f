//! Infrastructure layer for liveview-bridge.
//!
//! The infrastructure layer handles all I/O: accepting WebSocket connections
//! from viewers, writing gestures to the UI's Unix socket, and reading frame
//! images from disk.
//!
//! # Responsibilities
//!
//! - Binding a TCP listener for viewer WebSocket connections
//! - Spawning per-viewer Tokio tasks
//! - Delivering gestures over short-lived Unix-socket connections
//! - Locating, serving, and purging frame images
//! - Waiting for the network link at startup
//! - Loading the optional threshold file
//!
//! # What does NOT belong here?
//!
//! - Gesture classification (that is `liveview-core`)
//! - Message type definitions (that is the domain layer)

pub mod config_file;
pub mod event_forwarder;
pub mod event_listener;
pub mod frame_store;
pub mod startup;
pub mod ws_server;

pub use event_forwarder::EventForwarder;
pub use ws_server::{run_server, ViewerServer};

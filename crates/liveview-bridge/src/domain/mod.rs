//! Domain layer for liveview-bridge.
//!
//! The domain layer contains pure types that have no dependencies on I/O,
//! networking, or external frameworks.
//!
//! # What belongs in the domain layer?
//!
//! - Message types (the JSON "language" between viewer and bridge)
//! - Configuration structures
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `UnixStream`, or `WebSocket` types
//! - File I/O or environment variable reading

pub mod config;
pub mod messages;

pub use config::BridgeConfig;
pub use messages::{BridgeToViewerMsg, ViewerToBridgeMsg};

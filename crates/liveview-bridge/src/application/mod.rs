//! Application layer for liveview-bridge.
//!
//! The application layer orchestrates the business logic: it knows *what* to
//! do with a viewer's samples, but delegates *how* gestures reach the UI to
//! the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Normalizing samples into device coordinates
//! - Running them through the gesture classifier
//! - Handing each resulting gesture to an [`EventSink`], once
//! - Defining the error types for rejected samples and failed deliveries
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or listening for connections (that is infrastructure)
//! - WebSocket framing (handled by tokio-tungstenite)

pub mod relay;

pub use relay::{BatchOutcome, EventSink, ForwardError, GestureRelay, RelayError, SampleOutcome};

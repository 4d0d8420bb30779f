//! Wire format for gesture messages on the local IPC channel.
//!
//! The consumer application accepts short-lived connections on a
//! filesystem-addressed socket and reads exactly one message from each.  A
//! message is a single UTF-8 JSON object: the gesture's own fields plus the
//! wall-clock time at which the bridge delivered it.
//!
//! ```json
//! {"type":"scroll","x":900,"y":500,"deltaY":-30.0,"direction":"up","amount":30.0,"timestamp":1718000000.125}
//! ```
//!
//! # Why JSON?
//!
//! The consumer is a separate program with its own JSON parser already in
//! place.  A self-describing text encoding lets it pick out the fields it
//! cares about (`type`, `x`, `y`, ...) and ignore the rest, so new fields can
//! be added without breaking older consumers.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::gesture::GestureEvent;

/// The largest message a consumer is expected to read from one connection.
pub const MAX_MESSAGE_BYTES: usize = 2048;

/// Errors that can occur while encoding or decoding an IPC message.
#[derive(Debug, Error)]
pub enum WireError {
    /// The message could not be produced or parsed as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The encoded message exceeds [`MAX_MESSAGE_BYTES`].
    #[error("message is {size} bytes; the limit is {MAX_MESSAGE_BYTES}")]
    TooLarge { size: usize },
}

/// One message on the IPC channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    #[serde(flatten)]
    pub event: GestureEvent,

    /// Delivery time as fractional seconds since the Unix epoch.
    pub timestamp: f64,
}

impl IpcMessage {
    pub fn new(event: GestureEvent, delivered_at: SystemTime) -> Self {
        let timestamp = delivered_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self { event, timestamp }
    }
}

/// Encodes `event` stamped with `delivered_at` into the bytes to write.
///
/// # Errors
///
/// Returns [`WireError::TooLarge`] if the result would not fit in a single
/// consumer read, or [`WireError::Json`] if serialization fails.
pub fn encode_message(event: &GestureEvent, delivered_at: SystemTime) -> Result<Vec<u8>, WireError> {
    let message = IpcMessage::new(event.clone(), delivered_at);
    let bytes = serde_json::to_vec(&message)?;
    if bytes.len() > MAX_MESSAGE_BYTES {
        return Err(WireError::TooLarge { size: bytes.len() });
    }
    Ok(bytes)
}

/// Decodes one message as read by the consumer.
///
/// # Errors
///
/// Returns [`WireError::Json`] for malformed input or an unknown `type` tag.
pub fn decode_message(bytes: &[u8]) -> Result<IpcMessage, WireError> {
    Ok(serde_json::from_slice(bytes)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64, millis: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs) + Duration::from_millis(millis)
    }

    #[test]
    fn test_encoded_tap_has_type_position_and_timestamp() {
        // Arrange
        let event = GestureEvent::Tap { x: 1080, y: 540 };

        // Act
        let bytes = encode_message(&event, at(1_700_000_000, 250)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        // Assert
        assert_eq!(value["type"], "tap");
        assert_eq!(value["x"], 1080);
        assert_eq!(value["y"], 540);
        assert_eq!(value["timestamp"], 1_700_000_000.25);
    }

    #[test]
    fn test_encoded_scroll_carries_variant_fields() {
        let event = GestureEvent::scroll(900, 500, -30.0);

        let bytes = encode_message(&event, at(1, 0)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["type"], "scroll");
        assert_eq!(value["deltaY"], -30.0);
        assert_eq!(value["direction"], "up");
        assert_eq!(value["amount"], 30.0);
    }

    #[test]
    fn test_consumer_decodes_what_the_bridge_encodes() {
        let event = GestureEvent::Drag {
            x: 10,
            y: 20,
            start_x: 0,
            start_y: 0,
            dx: 10,
            dy: 20,
        };

        let bytes = encode_message(&event, at(42, 0)).unwrap();
        let message = decode_message(&bytes).unwrap();

        assert_eq!(message.event, event);
        assert_eq!(message.timestamp, 42.0);
    }

    #[test]
    fn test_decode_rejects_unknown_type_tag() {
        let result = decode_message(br#"{"type":"pinch","x":1,"y":2,"timestamp":0}"#);

        assert!(matches!(result, Err(WireError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_message() {
        let result = decode_message(br#"{"type":"tap","x":1"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_every_event_fits_in_one_consumer_read() {
        let event = GestureEvent::Drag {
            x: i32::MAX,
            y: i32::MIN,
            start_x: i32::MAX,
            start_y: i32::MIN,
            dx: i32::MIN,
            dy: i32::MAX,
        };

        let bytes = encode_message(&event, SystemTime::now()).unwrap();

        assert!(bytes.len() <= MAX_MESSAGE_BYTES);
    }
}

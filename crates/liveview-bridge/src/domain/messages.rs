//! JSON message types for the viewer-facing WebSocket protocol.
//!
//! # Message flow
//!
//! ```text
//! Viewer → Bridge: JSON text frame → ViewerToBridgeMsg
//! Bridge → Viewer: BridgeToViewerMsg → JSON text frame
//!                  (+ one binary frame carrying the image for FetchFrame)
//! ```
//!
//! # JSON discriminant
//!
//! Every message is a JSON object with a `"type"` field that identifies the
//! variant.  Serde's `#[serde(tag = "type")]` attribute handles this
//! automatically.
//!
//! Raw samples are carried as [`UncheckedSample`] so that a sample with a
//! missing or unknown field still parses and can be rejected with a precise
//! validation reason.

use liveview_core::{SurfaceSize, UncheckedSample};
use serde::{Deserialize, Serialize};

// ── Viewer → Bridge messages ──────────────────────────────────────────────────

/// All messages a viewer can send to the bridge.
///
/// # Serde representation
///
/// ```json
/// {"type":"Sample","sample":{"pointerId":1,"x":320,"y":180,"kind":"press","modality":"touch","timestamp":1000},"surface":{"width":720,"height":360}}
/// {"type":"Batch","samples":[...]}
/// {"type":"Touch","x":1080,"y":540}
/// {"type":"FetchFrame"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewerToBridgeMsg {
    /// One raw pointer sample.
    Sample {
        sample: UncheckedSample,
        /// When present, the sample's coordinates are surface pixels of a
        /// surface this size and are normalized into device space.  When
        /// absent they are already device coordinates.
        #[serde(default)]
        surface: Option<SurfaceSize>,
    },

    /// A short, ordered sequence of related samples (e.g. coalesced moves).
    Batch {
        /// Kept as raw JSON; each element is read as an [`UncheckedSample`]
        /// on its own so one bad element cannot fail the whole batch.
        samples: Vec<serde_json::Value>,
        #[serde(default)]
        surface: Option<SurfaceSize>,
    },

    /// Legacy single-shot touch from older viewers; always a click.
    Touch {
        x: f64,
        y: f64,
        #[serde(default)]
        surface: Option<SurfaceSize>,
    },

    /// Request the newest frame image.
    FetchFrame,
}

impl ViewerToBridgeMsg {
    /// Short variant name for log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Sample { .. } => "Sample",
            Self::Batch { .. } => "Batch",
            Self::Touch { .. } => "Touch",
            Self::FetchFrame => "FetchFrame",
        }
    }
}

// ── Bridge → Viewer messages ──────────────────────────────────────────────────

/// All JSON messages the bridge sends to a viewer.
///
/// # Serde representation
///
/// ```json
/// {"type":"SampleAck","event":"tap","delivered":true}
/// {"type":"BatchAck","accepted":4,"rejected":0,"delivered":1}
/// {"type":"Rejected","reason":"unknown sample kind: \"hover\""}
/// {"type":"Frame","name":"ui_frame_1718000000.png","size":48213}
/// {"type":"NoFrame"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeToViewerMsg {
    /// A sample was accepted.
    SampleAck {
        /// Wire tag of the gesture it produced, if any.
        event: Option<String>,
        /// Whether that gesture reached the UI process.
        delivered: bool,
    },

    /// A batch was processed.
    BatchAck {
        accepted: u32,
        rejected: u32,
        /// Number of gestures that reached the UI process.
        delivered: u32,
    },

    /// A message or sample was refused; nothing changed on the bridge.
    Rejected { reason: String },

    /// Header for the binary frame that follows immediately.
    Frame { name: String, size: u64 },

    /// No frame has been written yet.
    NoFrame,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sample_message_parses_with_surface() {
        let value = json!({
            "type": "Sample",
            "sample": {"pointerId": 1, "x": 10, "y": 20, "kind": "press", "timestamp": 5},
            "surface": {"width": 720.0, "height": 360.0}
        });

        let msg: ViewerToBridgeMsg = serde_json::from_value(value).unwrap();

        match msg {
            ViewerToBridgeMsg::Sample { sample, surface } => {
                assert_eq!(sample.pointer_id, Some(1));
                assert_eq!(sample.kind.as_deref(), Some("press"));
                assert_eq!(
                    surface,
                    Some(SurfaceSize {
                        width: 720.0,
                        height: 360.0
                    })
                );
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_sample_message_without_surface_defaults_to_none() {
        let value = json!({"type": "Sample", "sample": {"kind": "move"}});

        let msg: ViewerToBridgeMsg = serde_json::from_value(value).unwrap();

        assert!(matches!(msg, ViewerToBridgeMsg::Sample { surface: None, .. }));
    }

    #[test]
    fn test_sample_with_unknown_kind_still_parses() {
        // Validation, not deserialization, rejects the kind.
        let value = json!({"type": "Sample", "sample": {"kind": "hover", "x": 1, "y": 1}});

        assert!(serde_json::from_value::<ViewerToBridgeMsg>(value).is_ok());
    }

    #[test]
    fn test_batch_with_wrongly_typed_sample_still_parses() {
        // Arrange
        let value = json!({
            "type": "Batch",
            "samples": [
                {"pointerId": 1, "x": 10, "y": 10, "kind": "press", "timestamp": 0},
                {"pointerId": 1, "x": "left", "y": 10, "kind": "move", "timestamp": 5},
            ],
        });

        // Act
        let msg = serde_json::from_value::<ViewerToBridgeMsg>(value).unwrap();

        // Assert
        let ViewerToBridgeMsg::Batch { samples, surface } = msg else {
            panic!("expected Batch");
        };
        assert_eq!(samples.len(), 2);
        assert_eq!(surface, None);
    }

    #[test]
    fn test_fetch_frame_parses() {
        let msg: ViewerToBridgeMsg = serde_json::from_str(r#"{"type":"FetchFrame"}"#).unwrap();
        assert_eq!(msg, ViewerToBridgeMsg::FetchFrame);
        assert_eq!(msg.type_name(), "FetchFrame");
    }

    #[test]
    fn test_legacy_touch_parses() {
        let msg: ViewerToBridgeMsg =
            serde_json::from_str(r#"{"type":"Touch","x":100,"y":200}"#).unwrap();

        assert_eq!(
            msg,
            ViewerToBridgeMsg::Touch {
                x: 100.0,
                y: 200.0,
                surface: None
            }
        );
    }

    #[test]
    fn test_unknown_message_type_fails_to_parse() {
        assert!(serde_json::from_str::<ViewerToBridgeMsg>(r#"{"type":"Pinch"}"#).is_err());
    }

    #[test]
    fn test_sample_ack_serializes_with_type_tag() {
        let msg = BridgeToViewerMsg::SampleAck {
            event: Some("tap".to_string()),
            delivered: true,
        };

        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value, json!({"type": "SampleAck", "event": "tap", "delivered": true}));
    }

    #[test]
    fn test_no_frame_serializes_as_bare_tag() {
        let value = serde_json::to_value(BridgeToViewerMsg::NoFrame).unwrap();
        assert_eq!(value, json!({"type": "NoFrame"}));
    }
}

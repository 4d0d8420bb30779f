//! Classified gesture events.
//!
//! A [`GestureEvent`] is the classifier's output: a discrete, semantically
//! meaningful interaction derived from one or more raw samples.  Once built
//! it is never modified; it is handed to the forwarder by value and
//! discarded after delivery.
//!
//! # Serde representation
//!
//! The enum is internally tagged with a lowercase `"type"` field and
//! camelCase field names, which is exactly what the consumer expects on the
//! IPC channel:
//!
//! ```json
//! {"type":"tap","x":1080,"y":540}
//! {"type":"drag","x":300,"y":420,"startX":300,"startY":400,"dx":0,"dy":20}
//! {"type":"scroll","x":900,"y":500,"deltaY":-30.0,"direction":"up","amount":30.0}
//! ```

use serde::{Deserialize, Serialize};

/// Vertical scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Positive deltas scroll down; zero and negative scroll up.
    pub fn from_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }
}

/// A discrete interaction outcome.  All positions are device coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GestureEvent {
    /// Short touch without significant movement.
    Tap { x: i32, y: i32 },

    /// Short pointer press without significant movement.
    Click { x: i32, y: i32 },

    /// A pressed contact moved past the drag threshold.
    ///
    /// Carries the press position, where the consumer should begin the drag.
    #[serde(rename = "dragstart")]
    DragStart { x: i32, y: i32 },

    /// The dragging contact moved.
    #[serde(rename_all = "camelCase")]
    Drag {
        x: i32,
        y: i32,
        start_x: i32,
        start_y: i32,
        dx: i32,
        dy: i32,
    },

    /// The dragging contact was released.
    ///
    /// Carries the drag's start position; the final position is the one in
    /// the last `Drag` the consumer received.
    #[serde(rename = "dragend")]
    DragEnd { x: i32, y: i32 },

    /// Wheel notch or two-contact vertical swipe.
    #[serde(rename_all = "camelCase")]
    Scroll {
        x: i32,
        y: i32,
        delta_y: f64,
        direction: ScrollDirection,
        amount: f64,
    },
}

impl GestureEvent {
    /// Builds a `Scroll` whose direction and amount follow from `delta_y`.
    pub fn scroll(x: i32, y: i32, delta_y: f64) -> Self {
        Self::Scroll {
            x,
            y,
            delta_y,
            direction: ScrollDirection::from_delta(delta_y),
            amount: delta_y.abs(),
        }
    }

    /// The wire tag of this event, e.g. `"dragstart"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Tap { .. } => "tap",
            Self::Click { .. } => "click",
            Self::DragStart { .. } => "dragstart",
            Self::Drag { .. } => "drag",
            Self::DragEnd { .. } => "dragend",
            Self::Scroll { .. } => "scroll",
        }
    }

    /// The event's primary position.
    pub fn position(&self) -> (i32, i32) {
        match *self {
            Self::Tap { x, y }
            | Self::Click { x, y }
            | Self::DragStart { x, y }
            | Self::Drag { x, y, .. }
            | Self::DragEnd { x, y }
            | Self::Scroll { x, y, .. } => (x, y),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

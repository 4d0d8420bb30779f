//! Classification policy constants.
//!
//! These values are policy, not physics: they were picked so a finger that
//! wobbles during a tap is not mistaken for a drag, and so a short two-finger
//! swipe scrolls far enough to be useful.  They are exposed as configuration
//! so deployments can tune them.
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = ...)]`, so a TOML table that sets
//! only `touch_drag_threshold` still yields a complete value:
//!
//! ```toml
//! [gestures]
//! touch_drag_threshold = 14.0
//! ```

use serde::{Deserialize, Serialize};

use super::device::{DeviceSpace, DEFAULT_DEVICE_HEIGHT, DEFAULT_DEVICE_WIDTH};
use super::sample::InputModality;

/// Tunable thresholds for the gesture classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureThresholds {
    /// Distance (device px) a mouse must travel while pressed to start a drag.
    #[serde(default = "default_pointer_drag_threshold")]
    pub pointer_drag_threshold: f64,

    /// Distance (device px) a finger must travel while down to start a drag.
    ///
    /// Larger than the pointer threshold because fingers are imprecise.
    #[serde(default = "default_touch_drag_threshold")]
    pub touch_drag_threshold: f64,

    /// A press shorter than this resolves into a tap or click.
    #[serde(default = "default_tap_max_duration_ms")]
    pub tap_max_duration_ms: u64,

    /// Multiplier applied to two-contact midpoint travel before it is
    /// reported as a scroll delta.
    #[serde(default = "default_two_contact_scroll_gain")]
    pub two_contact_scroll_gain: f64,

    /// Logical width of the consumer's coordinate space.
    #[serde(default = "default_device_width")]
    pub device_width: u32,

    /// Logical height of the consumer's coordinate space.
    #[serde(default = "default_device_height")]
    pub device_height: u32,
}

impl GestureThresholds {
    /// Drag distance threshold for the given modality.
    pub fn drag_threshold(&self, modality: InputModality) -> f64 {
        match modality {
            InputModality::Pointer => self.pointer_drag_threshold,
            InputModality::Touch => self.touch_drag_threshold,
        }
    }

    pub fn device_space(&self) -> DeviceSpace {
        DeviceSpace::new(self.device_width, self.device_height)
    }
}

impl Default for GestureThresholds {
    /// | Field                     | Default |
    /// |---------------------------|---------|
    /// | pointer_drag_threshold    | 5.0     |
    /// | touch_drag_threshold      | 10.0    |
    /// | tap_max_duration_ms       | 300     |
    /// | two_contact_scroll_gain   | 3.0     |
    /// | device_width × height     | 2160 × 1080 |
    fn default() -> Self {
        Self {
            pointer_drag_threshold: default_pointer_drag_threshold(),
            touch_drag_threshold: default_touch_drag_threshold(),
            tap_max_duration_ms: default_tap_max_duration_ms(),
            two_contact_scroll_gain: default_two_contact_scroll_gain(),
            device_width: default_device_width(),
            device_height: default_device_height(),
        }
    }
}

fn default_pointer_drag_threshold() -> f64 {
    5.0
}

fn default_touch_drag_threshold() -> f64 {
    10.0
}

fn default_tap_max_duration_ms() -> u64 {
    300
}

fn default_two_contact_scroll_gain() -> f64 {
    3.0
}

fn default_device_width() -> u32 {
    DEFAULT_DEVICE_WIDTH
}

fn default_device_height() -> u32 {
    DEFAULT_DEVICE_HEIGHT
}

// ── Tests ─────────────────────────────────────────────────────────────────────

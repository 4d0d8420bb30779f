//! Raw pointer samples and their validation.
//!
//! A *raw sample* is one timestamped observation of a pointer or finger:
//! where it is, and whether it just went down, moved, came up, or scrolled.
//!
//! Samples arrive from an untrusted remote client, so they come in two
//! shapes:
//!
//! - [`UncheckedSample`] – exactly what was on the wire.  Every field is
//!   optional so that a missing field becomes a [`ValidationError`] instead
//!   of an opaque deserialization failure.
//! - [`RawSample`] – the validated form.  Only a `RawSample` can reach the
//!   classifier's state machine, so a malformed sample can never touch a
//!   session.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::device::{DeviceSpace, SurfaceSize};

/// Error returned when a raw sample is malformed or incomplete.
///
/// A rejected sample produces no session mutation and no gesture event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A field required for this sample kind is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The `kind` string is not one of the known sample kinds.
    #[error("unknown sample kind: {0:?}")]
    UnknownKind(String),

    /// The `modality` string is neither `pointer` nor `touch`.
    #[error("unknown input modality: {0:?}")]
    UnknownModality(String),

    /// A coordinate is NaN or infinite.
    #[error("coordinate is not a finite number")]
    NonFiniteCoordinate,

    /// The wheel delta is NaN or infinite.
    #[error("wheel delta is not a finite number")]
    NonFiniteWheelDelta,

    /// The position lies outside the device coordinate space.
    #[error("position ({x}, {y}) is outside the device space")]
    OutOfBounds { x: f64, y: f64 },
}

/// The input device class that produced a sample.
///
/// The modality selects the drag distance threshold and whether a short
/// press resolves into a `Tap` (touch) or a `Click` (pointer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputModality {
    /// A precise pointer such as a mouse.
    Pointer,
    /// A finger on a touch surface.
    Touch,
}

impl InputModality {
    fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "pointer" | "mouse" => Ok(Self::Pointer),
            "touch" => Ok(Self::Touch),
            other => Err(ValidationError::UnknownModality(other.to_string())),
        }
    }
}

/// What happened to the pointer in this sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleKind {
    /// Button pressed or finger touched down.
    Press,
    /// Pointer or finger moved while tracked.
    Move,
    /// Button released or finger lifted.
    Release,
    /// The platform aborted the contact (e.g. a touch-cancel).
    Cancel,
    /// Desktop scroll wheel notch.  Positive `delta_y` scrolls down.
    Wheel { delta_y: f64 },
}

/// A validated raw sample in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Identity of one continuous contact or button press.
    pub pointer_id: u32,
    pub x: i32,
    pub y: i32,
    pub kind: SampleKind,
    pub modality: InputModality,
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: u64,
}

/// A raw sample exactly as received from the viewer.
///
/// # JSON representation
///
/// ```json
/// {"pointerId":1,"x":1080,"y":540,"kind":"press","modality":"touch","timestamp":1712}
/// {"x":300,"y":200,"kind":"wheel","wheelDelta":120,"timestamp":1750}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UncheckedSample {
    pub pointer_id: Option<u32>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub kind: Option<String>,
    pub modality: Option<String>,
    pub wheel_delta: Option<f64>,
    /// Milliseconds.  Fractional values (DOM high-resolution timestamps) are
    /// truncated.
    #[serde(default, deserialize_with = "whole_millis")]
    pub timestamp: Option<u64>,
}

fn whole_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(ms) if ms.is_finite() && ms >= 0.0 => Ok(Some(ms as u64)),
        Some(ms) => Err(D::Error::custom(format!("invalid timestamp {ms}"))),
    }
}

impl UncheckedSample {
    /// Rescales `x`/`y` from viewer-surface pixels into device coordinates.
    ///
    /// Absent coordinates stay absent so validation can report them.
    pub fn normalized(mut self, surface: SurfaceSize, space: &DeviceSpace) -> Self {
        if let (Some(x), Some(y)) = (self.x, self.y) {
            let (nx, ny) = space.normalize(x, y, surface);
            self.x = Some(nx);
            self.y = Some(ny);
        }
        self
    }

    /// Checks every field and produces a [`RawSample`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first problem found.
    pub fn validate(&self, space: &DeviceSpace) -> Result<RawSample, ValidationError> {
        let kind_str = self
            .kind
            .as_deref()
            .ok_or(ValidationError::MissingField("kind"))?;

        let kind = match kind_str {
            "press" => SampleKind::Press,
            "move" => SampleKind::Move,
            "release" => SampleKind::Release,
            "cancel" => SampleKind::Cancel,
            "wheel" => {
                let delta_y = self
                    .wheel_delta
                    .ok_or(ValidationError::MissingField("wheelDelta"))?;
                if !delta_y.is_finite() {
                    return Err(ValidationError::NonFiniteWheelDelta);
                }
                SampleKind::Wheel { delta_y }
            }
            other => return Err(ValidationError::UnknownKind(other.to_string())),
        };

        // Wheel notches are not tied to a contact, so the id is optional there.
        let pointer_id = match (self.pointer_id, kind) {
            (Some(id), _) => id,
            (None, SampleKind::Wheel { .. }) => 0,
            (None, _) => return Err(ValidationError::MissingField("pointerId")),
        };

        let x = self.x.ok_or(ValidationError::MissingField("x"))?;
        let y = self.y.ok_or(ValidationError::MissingField("y"))?;
        if !x.is_finite() || !y.is_finite() {
            return Err(ValidationError::NonFiniteCoordinate);
        }

        // `as` saturates, so anything far outside still fails `contains`.
        let (rx, ry) = (x.round() as i32, y.round() as i32);
        if !space.contains(rx, ry) {
            return Err(ValidationError::OutOfBounds { x, y });
        }

        let modality = match self.modality.as_deref() {
            Some(m) => InputModality::parse(m)?,
            None => InputModality::Pointer,
        };

        let timestamp_ms = self
            .timestamp
            .ok_or(ValidationError::MissingField("timestamp"))?;

        Ok(RawSample {
            pointer_id,
            x: rx,
            y: ry,
            kind,
            modality,
            timestamp_ms,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

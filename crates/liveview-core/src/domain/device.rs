//! Device coordinate space.
//!
//! Every position exchanged with the consumer application is expressed in a
//! fixed logical resolution (the *device space*), regardless of how large the
//! frame happens to be drawn in the remote viewer.  The viewer may report
//! positions in its own surface pixels together with the surface size; this
//! module maps them into device space.

use serde::{Deserialize, Serialize};

/// Default device width in logical pixels.
pub const DEFAULT_DEVICE_WIDTH: u32 = 2160;

/// Default device height in logical pixels.
pub const DEFAULT_DEVICE_HEIGHT: u32 = 1080;

/// The fixed logical resolution of the consumer application.
///
/// Valid positions are `[0, width) × [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpace {
    pub width: u32,
    pub height: u32,
}

/// On-screen size of the viewer surface that displays the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl DeviceSpace {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if `(x, y)` lies inside the device space.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width as i64 && (y as i64) < self.height as i64
    }

    /// Maps a position in viewer-surface pixels into device coordinates.
    ///
    /// The result is rounded to whole device pixels and clamped onto the
    /// device space, so a pointer that strays past the edge of the drawn
    /// frame still lands on the nearest edge pixel.  A degenerate surface
    /// (zero, negative, or non-finite size) leaves the position untouched;
    /// validation rejects it later if it is out of range.
    pub fn normalize(&self, x: f64, y: f64, surface: SurfaceSize) -> (f64, f64) {
        if !is_usable_extent(surface.width) || !is_usable_extent(surface.height) {
            return (x, y);
        }
        let nx = (x / surface.width * self.width as f64).round();
        let ny = (y / surface.height * self.height as f64).round();
        (
            clamp_axis(nx, self.width),
            clamp_axis(ny, self.height),
        )
    }
}

impl Default for DeviceSpace {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_WIDTH, DEFAULT_DEVICE_HEIGHT)
    }
}

fn is_usable_extent(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn clamp_axis(v: f64, extent: u32) -> f64 {
    // NaN passes through; validation reports it as non-finite.
    if v.is_nan() {
        return v;
    }
    v.clamp(0.0, extent.saturating_sub(1) as f64)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

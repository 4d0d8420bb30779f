//! Per-contact session state.
//!
//! A [`Session`] exists for every pointer id that is currently pressed.  It
//! is created by a `press` sample and destroyed by the matching `release`
//! (or `cancel`).  Sessions for different pointer ids never share mutable
//! state; the one exception is the two-contact scroll, which keeps its own
//! explicit [`ContactPair`] record instead of hanging data off either
//! session.

use super::sample::InputModality;

/// Where a session is in its press → resolve lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not pressed.  Sessions are removed rather than parked here, so this
    /// only shows up in snapshots taken by callers.
    Idle,
    /// Pressed but not yet moved past the drag threshold.
    Pressed,
    /// Moved past the drag threshold; every move is reported as a drag.
    Dragging,
}

/// Mutable state for one active contact.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub pointer_id: u32,
    pub modality: InputModality,
    pub phase: Phase,
    pub start_x: i32,
    pub start_y: i32,
    pub start_time_ms: u64,
    /// Most recent position; needed to compute two-contact midpoints.
    pub last_x: i32,
    pub last_y: i32,
    /// Set once this contact has been part of a two-contact gesture.  Such a
    /// session never resolves into a tap or a new drag.
    pub multi_contact: bool,
}

impl Session {
    /// Opens a session in the `Pressed` phase at the press position.
    pub fn pressed(
        pointer_id: u32,
        modality: InputModality,
        x: i32,
        y: i32,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            pointer_id,
            modality,
            phase: Phase::Pressed,
            start_x: x,
            start_y: y,
            start_time_ms: timestamp_ms,
            last_x: x,
            last_y: y,
            multi_contact: false,
        }
    }

    /// Euclidean distance from the press position to `(x, y)`.
    pub fn distance_from_start(&self, x: i32, y: i32) -> f64 {
        let dx = f64::from(x - self.start_x);
        let dy = f64::from(y - self.start_y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Milliseconds since the press.  Saturates at zero if the clock the
    /// client used went backwards.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_time_ms)
    }
}

/// Pseudo-session for a two-contact scroll, keyed by the pair of ids.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPair {
    /// Lower of the two pointer ids.
    pub first: u32,
    /// Higher of the two pointer ids.
    pub second: u32,
    /// Midpoint Y seen on the previous move, `None` until the first move.
    pub last_mid_y: Option<f64>,
}

impl ContactPair {
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            first: a.min(b),
            second: a.max(b),
            last_mid_y: None,
        }
    }

    pub fn contains(&self, pointer_id: u32) -> bool {
        self.first == pointer_id || self.second == pointer_id
    }

    /// Returns `true` if this pair is made of exactly `a` and `b`.
    pub fn is_pair(&self, a: u32, b: u32) -> bool {
        self.first == a.min(b) && self.second == a.max(b)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

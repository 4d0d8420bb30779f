//! Domain entities for the live-view input bridge.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: nothing in here opens a socket, reads a file, or awaits a
//! future.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of a clean-architecture project holds the rules that
//! make the system what it is.  Here that is the question "given these raw
//! pointer samples, did the user tap, drag, or scroll?".  Keeping it free of
//! I/O means the whole state machine can be exercised by plain unit tests
//! that feed it hand-written samples.

/// The gesture state machine.
pub mod classifier;

/// Fixed logical resolution and viewer-surface normalization.
pub mod device;

/// Classified gesture events (the classifier's output).
pub mod gesture;

/// Raw pointer samples and their validation.
pub mod sample;

/// Per-contact session state tracked between press and release.
pub mod session;

/// Policy constants: drag distances, tap duration, scroll gain.
pub mod thresholds;

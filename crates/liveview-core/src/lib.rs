//! # liveview-core
//!
//! Shared library for the live-view input bridge containing the gesture
//! classifier, the raw pointer sample model, the fixed device coordinate
//! space, and the wire format used to hand gestures to the consumer process.
//!
//! This crate is used by the bridge binary and by anything that consumes the
//! IPC messages it produces.  It has zero dependencies on OS APIs, async
//! runtimes, or sockets.
//!
//! # Architecture overview (for beginners)
//!
//! A remote viewer looks at the latest rendered frame of a local graphical
//! application and pokes at it with a mouse or with fingers.  The viewer
//! reports every low-level pointer observation (press, move, release, wheel)
//! as a *raw sample*.  Raw samples are too noisy for the application to act
//! on directly: a finger that wobbles by three pixels during a tap is still a
//! tap, not a drag.
//!
//! This crate turns the raw stream into a handful of discrete *gestures*:
//!
//! - **`domain`** – The data model (samples, sessions, gestures, device
//!   space) and the [`GestureClassifier`] state machine that disambiguates
//!   taps, drags, and scrolls using distance and time thresholds.
//!
//! - **`protocol`** – How a gesture is written onto the local IPC channel:
//!   one self-describing JSON object per message.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `liveview_core::GestureClassifier` instead of the full module path.
pub use domain::classifier::GestureClassifier;
pub use domain::device::{DeviceSpace, SurfaceSize};
pub use domain::gesture::{GestureEvent, ScrollDirection};
pub use domain::sample::{InputModality, RawSample, SampleKind, UncheckedSample, ValidationError};
pub use domain::session::{ContactPair, Phase, Session};
pub use domain::thresholds::GestureThresholds;
pub use protocol::ipc::{decode_message, encode_message, IpcMessage, WireError};

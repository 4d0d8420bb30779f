//! GestureRelay: turns one viewer's raw samples into delivered gestures.
//!
//! This is the glue between the viewer endpoint and the UI process.  Each
//! viewer connection owns one relay, and with it one [`GestureClassifier`].
//! Because a relay is driven by a single task, all samples of one viewer are
//! applied strictly in arrival order and no two samples ever race on a
//! session's phase.  Different viewers own different relays and never see
//! each other's sessions.
//!
//! # Architecture
//!
//! The relay depends only on the [`EventSink`] trait.  The production sink
//! opens a Unix-socket connection per gesture; tests inject a recording or
//! mock sink.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use liveview_core::{
    GestureClassifier, GestureEvent, GestureThresholds, SurfaceSize, UncheckedSample,
    ValidationError,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Error returned when a gesture could not be handed to the UI process.
///
/// Both variants are handled the same way by callers: log and drop.  A
/// failed delivery never stops later samples from being classified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForwardError {
    /// The endpoint was unreachable, or writing to it failed.
    #[error("delivery failed: {cause}")]
    DeliveryFailed { cause: String },

    /// Connecting or writing did not finish in time.
    #[error("delivery timed out after {after:?}")]
    Timeout { after: Duration },
}

/// Error type for the relay.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayError {
    /// The sample was malformed; no session changed and nothing was sent.
    #[error("invalid sample: {0}")]
    Validation(#[from] ValidationError),
}

/// Destination for classified gestures.
///
/// Implementations deliver at most once and do not retry or queue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers one gesture.  Ownership of the event passes to the sink.
    async fn forward(&self, event: GestureEvent) -> Result<(), ForwardError>;
}

/// Result of handling one accepted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOutcome {
    /// The gesture the sample produced, if any.
    pub event: Option<GestureEvent>,
    /// `true` if that gesture reached the sink.
    pub delivered: bool,
}

impl SampleOutcome {
    fn silent() -> Self {
        Self {
            event: None,
            delivered: false,
        }
    }
}

/// Result of handling a batch of samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub accepted: u32,
    pub rejected: u32,
    pub delivered: u32,
}

/// Per-viewer classification and delivery pipeline.
pub struct GestureRelay {
    viewer: String,
    classifier: GestureClassifier,
    sink: Arc<dyn EventSink>,
}

impl GestureRelay {
    /// Creates a relay with no active sessions.
    ///
    /// `viewer` only labels log lines.
    pub fn new(
        viewer: impl Into<String>,
        thresholds: GestureThresholds,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            viewer: viewer.into(),
            classifier: GestureClassifier::new(thresholds),
            sink,
        }
    }

    /// Read access to the classifier, mostly for diagnostics.
    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Normalizes, classifies, and (if a gesture results) forwards one sample.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] for a malformed sample.  Delivery
    /// failures are not errors: they are logged and reported through
    /// [`SampleOutcome::delivered`].
    pub async fn handle_sample(
        &mut self,
        sample: UncheckedSample,
        surface: Option<SurfaceSize>,
    ) -> Result<SampleOutcome, RelayError> {
        let sample = self.normalize(sample, surface);

        let event = match self.classifier.classify(&sample) {
            Ok(Some(event)) => event,
            Ok(None) => return Ok(SampleOutcome::silent()),
            Err(e) => {
                warn!("viewer {}: rejected sample: {e}", self.viewer);
                return Err(e.into());
            }
        };

        let delivered = self.deliver(event.clone()).await;
        Ok(SampleOutcome {
            event: Some(event),
            delivered,
        })
    }

    /// Applies `samples` in order.  An invalid sample is counted and skipped;
    /// the rest of the batch still runs.
    ///
    /// Elements arrive as raw JSON so that one element with a wrongly typed
    /// field is rejected on its own instead of failing the whole batch.
    pub async fn handle_batch(
        &mut self,
        samples: Vec<serde_json::Value>,
        surface: Option<SurfaceSize>,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for value in samples {
            let sample = match serde_json::from_value::<UncheckedSample>(value) {
                Ok(sample) => sample,
                Err(e) => {
                    warn!("viewer {}: unreadable sample in batch: {e}", self.viewer);
                    outcome.rejected += 1;
                    continue;
                }
            };
            match self.handle_sample(sample, surface).await {
                Ok(result) => {
                    outcome.accepted += 1;
                    if result.delivered {
                        outcome.delivered += 1;
                    }
                }
                Err(_) => outcome.rejected += 1,
            }
        }
        outcome
    }

    /// Forwards a `Click` for the legacy single-shot touch message.
    ///
    /// Older viewers report a finished touch as one position; it bypasses the
    /// classifier and is always treated as a click.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] if the position is not finite or
    /// lies outside the device space.
    pub async fn handle_legacy_touch(
        &mut self,
        x: f64,
        y: f64,
        surface: Option<SurfaceSize>,
    ) -> Result<SampleOutcome, RelayError> {
        let device = self.classifier.device_space();
        let (x, y) = match surface {
            Some(s) => device.normalize(x, y, s),
            None => (x, y),
        };
        if !x.is_finite() || !y.is_finite() {
            return Err(ValidationError::NonFiniteCoordinate.into());
        }
        let (rx, ry) = (x.round() as i32, y.round() as i32);
        if !device.contains(rx, ry) {
            return Err(ValidationError::OutOfBounds { x, y }.into());
        }

        let event = GestureEvent::Click { x: rx, y: ry };
        let delivered = self.deliver(event.clone()).await;
        Ok(SampleOutcome {
            event: Some(event),
            delivered,
        })
    }

    /// Drops every open session.  Called when the viewer disconnects.
    ///
    /// Drags still in progress are closed with a delivered `DragEnd` first,
    /// so the UI does not keep a button held for a viewer that is gone.
    pub async fn end(&mut self) {
        let open = self.classifier.active_sessions();
        if open > 0 {
            debug!("viewer {}: dropping {open} open session(s)", self.viewer);
        }
        for event in self.classifier.drain() {
            self.deliver(event).await;
        }
    }

    fn normalize(&self, sample: UncheckedSample, surface: Option<SurfaceSize>) -> UncheckedSample {
        match surface {
            Some(s) => sample.normalized(s, &self.classifier.device_space()),
            None => sample,
        }
    }

    async fn deliver(&self, event: GestureEvent) -> bool {
        let tag = event.type_name();
        let (x, y) = event.position();
        match self.sink.forward(event).await {
            Ok(()) => {
                debug!("viewer {}: delivered {tag} at ({x}, {y})", self.viewer);
                true
            }
            Err(e) => {
                warn!("viewer {}: dropped {tag} at ({x}, {y}): {e}", self.viewer);
                false
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

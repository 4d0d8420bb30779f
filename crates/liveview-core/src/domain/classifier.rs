//! The gesture classifier: a pure state machine over raw pointer samples.
//!
//! # What does it decide? (for beginners)
//!
//! Given nothing but a stream of samples, the classifier has to tell apart
//! three things a user can do on the remote view:
//!
//! - **Tap / click** – press and release quickly without moving much.
//! - **Drag** – press and move further than a small distance threshold.
//! - **Scroll** – turn a mouse wheel, or move two fingers vertically.
//!
//! Each contact (pointer id) gets its own [`Session`]:
//!
//! ```text
//!            press                move > threshold
//!   Idle ──────────────▶ Pressed ──────────────────▶ Dragging
//!    ▲                      │  release                  │ release
//!    │   Tap/Click if short │                           │ DragEnd
//!    └──────────────────────┴───────────────────────────┘
//! ```
//!
//! Wheel samples are stateless and produce a `Scroll` immediately.  When
//! exactly two touch contacts are down at once, their moves are combined into
//! a [`ContactPair`] that reports vertical midpoint travel as scrolling.
//!
//! The classifier performs no I/O.  Callers that share one instance across
//! tasks must serialize access to it (e.g. behind a mutex, or by owning it in
//! a single task).

use std::collections::HashMap;

use tracing::debug;

use super::device::DeviceSpace;
use super::gesture::GestureEvent;
use super::sample::{InputModality, RawSample, SampleKind, UncheckedSample, ValidationError};
use super::session::{ContactPair, Phase, Session};
use super::thresholds::GestureThresholds;

/// Converts raw samples into at most one [`GestureEvent`] each.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    thresholds: GestureThresholds,
    device: DeviceSpace,
    sessions: HashMap<u32, Session>,
    pair: Option<ContactPair>,
}

impl GestureClassifier {
    /// Creates a classifier with no active sessions.
    pub fn new(thresholds: GestureThresholds) -> Self {
        let device = thresholds.device_space();
        Self {
            thresholds,
            device,
            sessions: HashMap::new(),
            pair: None,
        }
    }

    /// The coordinate space samples are validated against.
    pub fn device_space(&self) -> DeviceSpace {
        self.device
    }

    /// Snapshot access to the session for `pointer_id`, if one is active.
    pub fn session(&self, pointer_id: u32) -> Option<&Session> {
        self.sessions.get(&pointer_id)
    }

    /// Number of contacts currently pressed.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// The active two-contact pseudo-session, if exactly two touches are down.
    pub fn contact_pair(&self) -> Option<&ContactPair> {
        self.pair.as_ref()
    }

    /// Drops every session, e.g. when the viewer that owned them goes away.
    ///
    /// Returns a `DragEnd` for each contact that was mid-drag, so the
    /// consumer never stays stuck with a drag open.
    pub fn drain(&mut self) -> Vec<GestureEvent> {
        self.pair = None;
        let mut ends: Vec<(u32, GestureEvent)> = self
            .sessions
            .drain()
            .filter_map(|(id, session)| Some((id, Self::end_drag(&session)?)))
            .collect();
        ends.sort_by_key(|(id, _)| *id);
        ends.into_iter().map(|(_, event)| event).collect()
    }

    /// Validates `sample` and feeds it through the state machine.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a malformed sample.  In that case no
    /// session is touched and no event is produced.
    pub fn classify(
        &mut self,
        sample: &UncheckedSample,
    ) -> Result<Option<GestureEvent>, ValidationError> {
        let raw = sample.validate(&self.device)?;
        Ok(self.apply(raw))
    }

    /// Feeds an already-validated sample through the state machine.
    pub fn apply(&mut self, sample: RawSample) -> Option<GestureEvent> {
        match sample.kind {
            SampleKind::Press => self.on_press(sample),
            SampleKind::Move => self.on_move(sample),
            SampleKind::Release => self.on_release(sample),
            SampleKind::Cancel => self.on_cancel(sample),
            SampleKind::Wheel { delta_y } => {
                Some(GestureEvent::scroll(sample.x, sample.y, delta_y))
            }
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    fn on_press(&mut self, s: RawSample) -> Option<GestureEvent> {
        let session = Session::pressed(s.pointer_id, s.modality, s.x, s.y, s.timestamp_ms);
        let previous = self.sessions.insert(s.pointer_id, session);
        self.refresh_pair();

        // A lost release: close what the old session opened, then start over.
        let previous = previous?;
        debug!(
            "pointer {}: press while {:?}; restarting session",
            s.pointer_id, previous.phase
        );
        Self::end_drag(&previous)
    }

    /// The `DragEnd` owed by a session that disappears mid-drag.
    fn end_drag(session: &Session) -> Option<GestureEvent> {
        (session.phase == Phase::Dragging).then_some(GestureEvent::DragEnd {
            x: session.start_x,
            y: session.start_y,
        })
    }

    fn on_move(&mut self, s: RawSample) -> Option<GestureEvent> {
        let session = self.sessions.get_mut(&s.pointer_id)?;
        session.last_x = s.x;
        session.last_y = s.y;

        if self.pair.as_ref().is_some_and(|p| p.contains(s.pointer_id)) {
            return self.pair_scroll();
        }

        match session.phase {
            Phase::Pressed if session.multi_contact => None,
            Phase::Pressed => {
                let threshold = self.thresholds.drag_threshold(session.modality);
                if session.distance_from_start(s.x, s.y) > threshold {
                    session.phase = Phase::Dragging;
                    debug!("pointer {}: drag started", s.pointer_id);
                    Some(GestureEvent::DragStart {
                        x: session.start_x,
                        y: session.start_y,
                    })
                } else {
                    None
                }
            }
            Phase::Dragging => Some(GestureEvent::Drag {
                x: s.x,
                y: s.y,
                start_x: session.start_x,
                start_y: session.start_y,
                dx: s.x - session.start_x,
                dy: s.y - session.start_y,
            }),
            Phase::Idle => None,
        }
    }

    fn on_release(&mut self, s: RawSample) -> Option<GestureEvent> {
        let Some(session) = self.sessions.remove(&s.pointer_id) else {
            debug!("pointer {}: release without press ignored", s.pointer_id);
            return None;
        };

        let event = match session.phase {
            Phase::Dragging => Some(GestureEvent::DragEnd {
                x: session.start_x,
                y: session.start_y,
            }),
            Phase::Pressed if !session.multi_contact => {
                let elapsed = session.elapsed_ms(s.timestamp_ms);
                if elapsed < self.thresholds.tap_max_duration_ms {
                    Some(match session.modality {
                        InputModality::Touch => GestureEvent::Tap { x: s.x, y: s.y },
                        InputModality::Pointer => GestureEvent::Click { x: s.x, y: s.y },
                    })
                } else {
                    debug!(
                        "pointer {}: held {elapsed} ms without moving; no tap",
                        s.pointer_id
                    );
                    None
                }
            }
            _ => None,
        };

        self.refresh_pair();
        event
    }

    fn on_cancel(&mut self, s: RawSample) -> Option<GestureEvent> {
        let session = self.sessions.remove(&s.pointer_id)?;
        self.refresh_pair();
        Self::end_drag(&session)
    }

    // ── Two-contact scroll ────────────────────────────────────────────────────

    /// Re-derives the contact pair after a contact came or went.
    ///
    /// A pair exists exactly while two touch sessions are active.  A pair made
    /// of the same two ids survives (keeping its previous midpoint); any other
    /// change starts a fresh pair with no previous midpoint.
    fn refresh_pair(&mut self) {
        let touch_ids: Vec<u32> = self
            .sessions
            .values()
            .filter(|s| s.modality == InputModality::Touch)
            .map(|s| s.pointer_id)
            .collect();

        if touch_ids.len() == 2 {
            let (a, b) = (touch_ids[0], touch_ids[1]);
            if !self.pair.as_ref().is_some_and(|p| p.is_pair(a, b)) {
                debug!("pointers {a}+{b}: two-contact scroll armed");
                self.pair = Some(ContactPair::new(a, b));
            }
        } else {
            self.pair = None;
        }

        if touch_ids.len() >= 2 {
            for id in &touch_ids {
                if let Some(session) = self.sessions.get_mut(id) {
                    session.multi_contact = true;
                }
            }
        }
    }

    fn pair_scroll(&mut self) -> Option<GestureEvent> {
        let gain = self.thresholds.two_contact_scroll_gain;
        let pair = self.pair.as_mut()?;
        let a = self.sessions.get(&pair.first)?;
        let b = self.sessions.get(&pair.second)?;

        let mid_x = f64::from(a.last_x + b.last_x) / 2.0;
        let mid_y = f64::from(a.last_y + b.last_y) / 2.0;

        let event = pair.last_mid_y.map(|prev| {
            GestureEvent::scroll(
                mid_x.round() as i32,
                mid_y.round() as i32,
                (mid_y - prev) * gain,
            )
        });
        pair.last_mid_y = Some(mid_y);
        event
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureThresholds::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gesture::ScrollDirection;

    fn raw(id: u32, kind: SampleKind, modality: InputModality, x: i32, y: i32, t: u64) -> RawSample {
        RawSample {
            pointer_id: id,
            x,
            y,
            kind,
            modality,
            timestamp_ms: t,
        }
    }

    fn touch(id: u32, kind: SampleKind, x: i32, y: i32, t: u64) -> RawSample {
        raw(id, kind, InputModality::Touch, x, y, t)
    }

    fn mouse(kind: SampleKind, x: i32, y: i32, t: u64) -> RawSample {
        raw(1, kind, InputModality::Pointer, x, y, t)
    }

    #[test]
    fn test_press_emits_nothing_and_opens_session() {
        // Arrange
        let mut c = GestureClassifier::default();

        // Act
        let event = c.apply(touch(1, SampleKind::Press, 100, 100, 0));

        // Assert
        assert_eq!(event, None);
        let session = c.session(1).unwrap();
        assert_eq!(session.phase, Phase::Pressed);
        assert_eq!((session.start_x, session.start_y), (100, 100));
    }

    #[test]
    fn test_quick_touch_release_emits_tap_at_release_position() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 100, 100, 0));
        c.apply(touch(1, SampleKind::Move, 104, 103, 50));

        let event = c.apply(touch(1, SampleKind::Release, 104, 103, 120));

        assert_eq!(event, Some(GestureEvent::Tap { x: 104, y: 103 }));
        assert_eq!(c.active_sessions(), 0);
    }

    #[test]
    fn test_quick_mouse_release_emits_click() {
        let mut c = GestureClassifier::default();
        c.apply(mouse(SampleKind::Press, 10, 10, 0));

        let event = c.apply(mouse(SampleKind::Release, 10, 10, 80));

        assert_eq!(event, Some(GestureEvent::Click { x: 10, y: 10 }));
    }

    #[test]
    fn test_release_exactly_at_tap_threshold_is_not_a_tap() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 10, 10, 1000));

        let event = c.apply(touch(1, SampleKind::Release, 10, 10, 1300));

        assert_eq!(event, None);
    }

    #[test]
    fn test_mouse_uses_smaller_drag_threshold_than_touch() {
        // Arrange: 6 px of travel exceeds the 5 px pointer threshold but not
        // the 10 px touch threshold.
        let mut mouse_c = GestureClassifier::default();
        let mut touch_c = GestureClassifier::default();
        mouse_c.apply(mouse(SampleKind::Press, 0, 0, 0));
        touch_c.apply(touch(1, SampleKind::Press, 0, 0, 0));

        // Act
        let m = mouse_c.apply(mouse(SampleKind::Move, 6, 0, 10));
        let t = touch_c.apply(touch(1, SampleKind::Move, 6, 0, 10));

        // Assert
        assert_eq!(m, Some(GestureEvent::DragStart { x: 0, y: 0 }));
        assert_eq!(t, None);
    }

    #[test]
    fn test_distance_equal_to_threshold_does_not_start_drag() {
        let mut c = GestureClassifier::default();
        c.apply(mouse(SampleKind::Press, 0, 0, 0));

        assert_eq!(c.apply(mouse(SampleKind::Move, 3, 4, 10)), None);
        assert_eq!(c.session(1).unwrap().phase, Phase::Pressed);
    }

    #[test]
    fn test_drag_reports_offsets_from_start() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 300, 400, 0));
        c.apply(touch(1, SampleKind::Move, 300, 420, 10));

        let event = c.apply(touch(1, SampleKind::Move, 310, 450, 20));

        assert_eq!(
            event,
            Some(GestureEvent::Drag {
                x: 310,
                y: 450,
                start_x: 300,
                start_y: 400,
                dx: 10,
                dy: 50,
            })
        );
    }

    #[test]
    fn test_drag_end_carries_start_position() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 300, 400, 0));
        c.apply(touch(1, SampleKind::Move, 300, 430, 10));

        let event = c.apply(touch(1, SampleKind::Release, 300, 500, 2000));

        assert_eq!(event, Some(GestureEvent::DragEnd { x: 300, y: 400 }));
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut c = GestureClassifier::default();

        assert_eq!(c.apply(touch(5, SampleKind::Release, 1, 1, 10)), None);
        assert_eq!(c.active_sessions(), 0);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut c = GestureClassifier::default();

        assert_eq!(c.apply(mouse(SampleKind::Move, 500, 500, 10)), None);
        assert_eq!(c.active_sessions(), 0);
    }

    #[test]
    fn test_repeated_press_restarts_session() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 0, 0, 0));
        c.apply(touch(1, SampleKind::Move, 5, 0, 10));

        let repressed = c.apply(touch(1, SampleKind::Press, 200, 200, 1000));

        assert_eq!(repressed, None);
        let session = c.session(1).unwrap();
        assert_eq!(session.phase, Phase::Pressed);
        assert_eq!((session.start_x, session.start_y), (200, 200));
        assert_eq!(session.start_time_ms, 1000);
    }

    #[test]
    fn test_cancel_during_drag_emits_drag_end() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 0, 0, 0));
        c.apply(touch(1, SampleKind::Move, 0, 40, 10));

        let event = c.apply(touch(1, SampleKind::Cancel, 0, 40, 20));

        assert_eq!(event, Some(GestureEvent::DragEnd { x: 0, y: 0 }));
        assert_eq!(c.active_sessions(), 0);
    }

    #[test]
    fn test_cancel_while_pressed_emits_nothing() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 0, 0, 0));

        assert_eq!(c.apply(touch(1, SampleKind::Cancel, 0, 0, 20)), None);
        assert_eq!(c.active_sessions(), 0);
    }

    #[test]
    fn test_wheel_is_stateless() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 0, 0, 0));

        let event = c.apply(mouse(SampleKind::Wheel { delta_y: 120.0 }, 50, 60, 5));

        assert_eq!(event, Some(GestureEvent::scroll(50, 60, 120.0)));
        // The unrelated touch session is untouched.
        assert_eq!(c.session(1).unwrap().phase, Phase::Pressed);
    }

    #[test]
    fn test_second_touch_arms_contact_pair() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 100, 500, 0));
        assert!(c.contact_pair().is_none());

        c.apply(touch(2, SampleKind::Press, 300, 500, 5));

        let pair = c.contact_pair().unwrap();
        assert!(pair.is_pair(1, 2));
        assert_eq!(pair.last_mid_y, None);
    }

    #[test]
    fn test_two_contact_scroll_amplifies_midpoint_travel() {
        // Arrange
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 100, 500, 0));
        c.apply(touch(2, SampleKind::Press, 300, 500, 5));

        // Act: the first move only records the midpoint baseline
        let first = c.apply(touch(1, SampleKind::Move, 100, 500, 10));
        // Contact 2 moves up 20 px: the midpoint moves up 10 px
        let second = c.apply(touch(2, SampleKind::Move, 300, 480, 20));

        // Assert
        assert_eq!(first, None);
        assert_eq!(
            second,
            Some(GestureEvent::Scroll {
                x: 200,
                y: 490,
                delta_y: -30.0,
                direction: ScrollDirection::Up,
                amount: 30.0,
            })
        );
    }

    #[test]
    fn test_two_contact_release_does_not_tap() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 100, 500, 0));
        c.apply(touch(2, SampleKind::Press, 300, 500, 5));

        let r1 = c.apply(touch(2, SampleKind::Release, 300, 500, 50));
        let r2 = c.apply(touch(1, SampleKind::Release, 100, 500, 60));

        assert_eq!(r1, None);
        assert_eq!(r2, None);
        assert!(c.contact_pair().is_none());
    }

    #[test]
    fn test_third_touch_dissolves_pair() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 100, 500, 0));
        c.apply(touch(2, SampleKind::Press, 300, 500, 5));

        c.apply(touch(3, SampleKind::Press, 500, 500, 10));

        assert!(c.contact_pair().is_none());
        assert_eq!(c.apply(touch(3, SampleKind::Move, 500, 400, 20)), None);
    }

    #[test]
    fn test_two_mouse_pointers_do_not_form_pair() {
        let mut c = GestureClassifier::default();
        c.apply(raw(1, SampleKind::Press, InputModality::Pointer, 0, 0, 0));
        c.apply(raw(2, SampleKind::Press, InputModality::Pointer, 10, 10, 0));

        assert!(c.contact_pair().is_none());
    }

    #[test]
    fn test_drag_in_progress_still_ends_after_pair_dissolves() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 100, 100, 0));
        c.apply(touch(1, SampleKind::Move, 100, 150, 10));
        c.apply(touch(2, SampleKind::Press, 400, 100, 20));
        c.apply(touch(2, SampleKind::Release, 400, 100, 30));

        let moved = c.apply(touch(1, SampleKind::Move, 100, 160, 40));
        let released = c.apply(touch(1, SampleKind::Release, 100, 160, 50));

        assert!(matches!(moved, Some(GestureEvent::Drag { dy: 60, .. })));
        assert_eq!(released, Some(GestureEvent::DragEnd { x: 100, y: 100 }));
    }

    #[test]
    fn test_repeated_press_during_drag_ends_the_drag() {
        // Arrange: a drag whose release was lost
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 0, 0, 0));
        let started = c.apply(touch(1, SampleKind::Move, 0, 50, 10));

        // Act
        let repressed = c.apply(touch(1, SampleKind::Press, 500, 500, 20));

        // Assert
        assert_eq!(started, Some(GestureEvent::DragStart { x: 0, y: 0 }));
        assert_eq!(repressed, Some(GestureEvent::DragEnd { x: 0, y: 0 }));
        assert_eq!(c.session(1).unwrap().phase, Phase::Pressed);
    }

    #[test]
    fn test_drain_drops_all_sessions() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 100, 500, 0));
        c.apply(touch(2, SampleKind::Press, 300, 500, 5));

        let ended = c.drain();

        assert!(ended.is_empty());
        assert_eq!(c.active_sessions(), 0);
        assert!(c.contact_pair().is_none());
    }

    #[test]
    fn test_drain_ends_every_open_drag() {
        let mut c = GestureClassifier::default();
        c.apply(mouse(SampleKind::Press, 100, 100, 0));
        c.apply(mouse(SampleKind::Move, 160, 100, 10));
        c.apply(raw(2, SampleKind::Press, InputModality::Pointer, 400, 400, 0));
        c.apply(raw(2, SampleKind::Move, InputModality::Pointer, 400, 300, 10));
        c.apply(raw(3, SampleKind::Press, InputModality::Pointer, 900, 900, 0));

        let ended = c.drain();

        assert_eq!(
            ended,
            vec![
                GestureEvent::DragEnd { x: 100, y: 100 },
                GestureEvent::DragEnd { x: 400, y: 400 },
            ]
        );
        assert_eq!(c.active_sessions(), 0);
    }

    #[test]
    fn test_classify_rejects_unknown_kind_without_mutation() {
        let mut c = GestureClassifier::default();
        c.apply(touch(1, SampleKind::Press, 100, 100, 0));
        let before = c.session(1).cloned();
        let bad = UncheckedSample {
            pointer_id: Some(1),
            x: Some(900.0),
            y: Some(900.0),
            kind: Some("teleport".to_string()),
            modality: Some("touch".to_string()),
            wheel_delta: None,
            timestamp: Some(10),
        };

        let result = c.classify(&bad);

        assert!(matches!(result, Err(ValidationError::UnknownKind(_))));
        assert_eq!(c.session(1).cloned(), before);
    }
}

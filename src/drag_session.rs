//! Drag-to-value sessions.
//!
//! A [`DragSession`] lives from a primary pointer press on a field until the
//! drag ends. Pointer moves are only recorded; the value is recomputed once
//! per display frame, capped at roughly 60 commits per second, from the
//! latest recorded position. Each commit becomes the base for the next delta,
//! so snapping and clamping never accumulate drift.
//!
//! While a session exists it holds a [`PointerCapture`] from the widget's
//! [`CaptureSlot`]. The capture is what routes global pointer motion to the
//! widget, and it is released when the session is dropped, whichever way the
//! drag ends.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Minimum time between two commits of the same session.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Multiplier applied to drag deltas while Shift is held.
pub const FINE_DRAG_FACTOR: f64 = 0.1;

/// Pointer state carried by press, move and release events.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    /// Horizontal position in logical pixels.
    pub x: f64,
    /// Shift held: fine adjustment.
    pub shift: bool,
}

impl PointerSample {
    pub fn at(x: f64) -> Self {
        Self {
            x,
            ..Default::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Converts a horizontal displacement into a value delta.
pub fn drag_delta(delta_x: f64, sensitivity: f64, shift: bool) -> f64 {
    let factor = if shift { FINE_DRAG_FACTOR } else { 1.0 };
    delta_x * sensitivity * factor
}

/// Counts the live pointer captures of one widget.
///
/// Clones share the same counter, so the widget and whatever routes pointer
/// events to it observe the same registration.
#[derive(Clone, Debug, Default)]
pub struct CaptureSlot(Arc<AtomicUsize>);

impl CaptureSlot {
    /// Registers a capture that lasts until the returned guard is dropped.
    pub fn acquire(&self) -> PointerCapture {
        self.0.fetch_add(1, Ordering::AcqRel);
        PointerCapture { slot: self.clone() }
    }

    /// Number of captures currently held.
    pub fn registrations(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_held(&self) -> bool {
        self.registrations() > 0
    }
}

/// Scoped pointer capture. Dropping it releases the registration.
#[derive(Debug)]
pub struct PointerCapture {
    slot: CaptureSlot,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.slot.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// State of one active drag.
#[derive(Debug)]
pub struct DragSession {
    anchor_x: f64,
    last_x: f64,
    base_value: f64,
    latest: PointerSample,
    last_commit: Duration,
    _capture: PointerCapture,
}

impl DragSession {
    /// Starts a session at `sample`, dragging from `base_value`.
    ///
    /// `now` counts as the previous commit, so the first frame commits no
    /// sooner than [`FRAME_INTERVAL`] after the press.
    pub fn begin(
        sample: PointerSample,
        base_value: f64,
        now: Duration,
        capture: PointerCapture,
    ) -> Self {
        Self {
            anchor_x: sample.x,
            last_x: sample.x,
            base_value,
            latest: sample,
            last_commit: now,
            _capture: capture,
        }
    }

    /// Records a pointer move. Nothing is committed until the next frame.
    pub fn record(&mut self, sample: PointerSample) {
        self.latest = sample;
    }

    /// Whether pointer motion is waiting for a frame.
    pub fn has_pending_motion(&self) -> bool {
        self.latest.x != self.last_x
    }

    /// Total horizontal displacement since the press.
    pub fn displacement(&self) -> f64 {
        self.latest.x - self.anchor_x
    }

    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    /// Frame callback. Commits pending motion if the frame cap allows it.
    ///
    /// `constrain` turns the raw candidate into the committed value; its
    /// result becomes the new base.
    pub fn frame(
        &mut self,
        now: Duration,
        sensitivity: f64,
        constrain: impl FnOnce(f64) -> f64,
    ) -> Option<f64> {
        if now.saturating_sub(self.last_commit) < FRAME_INTERVAL {
            return None;
        }
        let committed = self.flush(sensitivity, constrain)?;
        self.last_commit = now;
        Some(committed)
    }

    /// Commits pending motion regardless of the frame cap.
    pub fn flush(&mut self, sensitivity: f64, constrain: impl FnOnce(f64) -> f64) -> Option<f64> {
        if !self.has_pending_motion() {
            return None;
        }
        let delta_x = self.latest.x - self.last_x;
        self.last_x = self.latest.x;

        let candidate = self.base_value + drag_delta(delta_x, sensitivity, self.latest.shift);
        let committed = constrain(candidate);
        self.base_value = committed;
        Some(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn session(slot: &CaptureSlot, x: f64, base: f64) -> DragSession {
        DragSession::begin(PointerSample::at(x), base, ms(0), slot.acquire())
    }

    #[test]
    fn shift_scales_delta_down() {
        let delta = drag_delta(100.0, 0.01, true);
        assert!((delta - 0.1).abs() < 1e-12);
        assert!((drag_delta(100.0, 0.01, false) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn capture_lives_as_long_as_session() {
        let slot = CaptureSlot::default();
        let drag = session(&slot, 0.0, 0.0);
        assert_eq!(slot.registrations(), 1);
        drop(drag);
        assert!(!slot.is_held());
    }

    #[test]
    fn frame_cap_defers_commit() {
        let slot = CaptureSlot::default();
        let mut drag = session(&slot, 0.0, 1.0);
        drag.record(PointerSample::at(10.0));

        assert_eq!(drag.frame(ms(8), 0.1, |v| v), None);
        assert!(drag.has_pending_motion());
        let committed = drag.frame(ms(16), 0.1, |v| v).unwrap();
        assert!((committed - 2.0).abs() < 1e-12);
    }

    #[test]
    fn frames_coalesce_to_latest_position() {
        let slot = CaptureSlot::default();
        let mut drag = session(&slot, 100.0, 0.0);
        for x in [101.0, 104.0, 103.0, 110.0] {
            drag.record(PointerSample::at(x));
        }
        let committed = drag.frame(ms(20), 1.0, |v| v).unwrap();
        assert_eq!(committed, 10.0);
        assert_eq!(drag.displacement(), 10.0);
    }

    #[test]
    fn idle_frame_commits_nothing() {
        let slot = CaptureSlot::default();
        let mut drag = session(&slot, 0.0, 5.0);
        assert_eq!(drag.frame(ms(100), 1.0, |v| v), None);
    }

    #[test]
    fn deltas_accumulate_against_constrained_value() {
        let slot = CaptureSlot::default();
        let mut drag = session(&slot, 0.0, 0.0);
        let clamp = |v: f64| v.min(1.0);

        drag.record(PointerSample::at(50.0));
        assert_eq!(drag.frame(ms(16), 0.1, clamp), Some(1.0));
        // Moving back starts from the clamped value, not from the overshoot.
        drag.record(PointerSample::at(45.0));
        let committed = drag.frame(ms(32), 0.1, clamp).unwrap();
        assert!((committed - 0.5).abs() < 1e-12);
        assert_eq!(drag.base_value(), committed);
    }
}

//! Long-press detection for touch reordering
//!
//! On touch screens the dashboard enters reorder mode after a card is held
//! still for the configured duration. Moving further than the tolerance
//! before that cancels the press so ordinary scrolling keeps working.
//!
//! The tracker is clock-free: callers pass `Instant`s in, and call
//! [`PressTracker::poll`] from a timer to fire a press that is held
//! without any pointer movement.

use crate::card::CardId;
use crate::config::LayoutConfig;
use std::fmt;
use std::time::{Duration, Instant};

/// Identifier of a captured pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u32);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer#{}", self.0)
    }
}

/// Pointer position in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create point
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    #[must_use]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Outcome of a tracked press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressEvent {
    /// Held long enough: enter reorder mode
    LongPress { pointer: PointerId, card: CardId },
    /// Moved too far before the threshold
    Cancelled { pointer: PointerId },
    /// Released before the threshold
    Tap { pointer: PointerId, card: CardId },
}

#[derive(Debug, Clone)]
struct PendingPress {
    pointer: PointerId,
    card: CardId,
    origin: Point,
    started_at: Instant,
}

/// Tracks at most one pending press
#[derive(Debug, Clone)]
pub struct PressTracker {
    long_press: Duration,
    tolerance_px: f64,
    pending: Option<PendingPress>,
}

impl PressTracker {
    /// Create tracker from engine configuration
    #[inline]
    #[must_use]
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            long_press: config.long_press(),
            tolerance_px: config.move_tolerance_px,
            pending: None,
        }
    }

    /// Pointer of the pending press, if any
    #[inline]
    #[must_use]
    pub fn pending_pointer(&self) -> Option<PointerId> {
        self.pending.as_ref().map(|p| p.pointer)
    }

    /// Start tracking a press on `card`.
    ///
    /// Returns `false` when another pointer's press is already pending.
    pub fn begin(&mut self, pointer: PointerId, card: CardId, at: Point, now: Instant) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(PendingPress {
            pointer,
            card,
            origin: at,
            started_at: now,
        });
        true
    }

    /// Feed a pointer movement
    pub fn moved(&mut self, pointer: PointerId, at: Point, now: Instant) -> Option<PressEvent> {
        let pending = self.pending.as_ref().filter(|p| p.pointer == pointer)?;

        if pending.origin.distance(at) > self.tolerance_px {
            self.pending = None;
            return Some(PressEvent::Cancelled { pointer });
        }
        self.poll(now)
    }

    /// Fire the long-press once the threshold has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<PressEvent> {
        let elapsed = self.elapsed(now)?;
        if elapsed < self.long_press {
            return None;
        }
        self.pending.take().map(|p| PressEvent::LongPress {
            pointer: p.pointer,
            card: p.card,
        })
    }

    /// Feed a pointer release
    pub fn release(&mut self, pointer: PointerId, now: Instant) -> Option<PressEvent> {
        if self.pending_pointer() != Some(pointer) {
            return None;
        }
        if let Some(event) = self.poll(now) {
            return Some(event);
        }
        self.pending
            .take()
            .map(|p| PressEvent::Tap { pointer, card: p.card })
    }

    /// Abandon the pending press of `pointer`
    pub fn cancel(&mut self, pointer: PointerId) -> Option<PressEvent> {
        if self.pending_pointer() != Some(pointer) {
            return None;
        }
        self.pending = None;
        Some(PressEvent::Cancelled { pointer })
    }

    /// Forget any pending press
    #[inline]
    pub fn reset(&mut self) {
        self.pending = None;
    }

    fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| now.saturating_duration_since(p.started_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINGER: PointerId = PointerId(1);
    const OTHER: PointerId = PointerId(2);

    fn tracker() -> PressTracker {
        PressTracker::new(&LayoutConfig::default())
    }

    #[test]
    fn held_press_fires_on_poll() {
        let mut t = tracker();
        let start = Instant::now();
        assert!(t.begin(FINGER, "tasks".into(), Point::new(10.0, 10.0), start));

        assert_eq!(t.poll(start + Duration::from_millis(499)), None);
        assert_eq!(
            t.poll(start + Duration::from_millis(500)),
            Some(PressEvent::LongPress {
                pointer: FINGER,
                card: "tasks".into()
            })
        );
        assert_eq!(t.pending_pointer(), None);
    }

    #[test]
    fn small_jitter_does_not_cancel() {
        let mut t = tracker();
        let start = Instant::now();
        t.begin(FINGER, "tasks".into(), Point::new(0.0, 0.0), start);

        let event = t.moved(FINGER, Point::new(3.0, 4.0), start + Duration::from_millis(100));
        assert_eq!(event, None);
        assert_eq!(t.pending_pointer(), Some(FINGER));
    }

    #[test]
    fn moving_past_tolerance_cancels() {
        let mut t = tracker();
        let start = Instant::now();
        t.begin(FINGER, "tasks".into(), Point::new(0.0, 0.0), start);

        let event = t.moved(FINGER, Point::new(6.0, 8.1), start + Duration::from_millis(100));
        assert_eq!(event, Some(PressEvent::Cancelled { pointer: FINGER }));
        assert_eq!(t.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn quick_release_is_a_tap() {
        let mut t = tracker();
        let start = Instant::now();
        t.begin(FINGER, "tasks".into(), Point::default(), start);

        assert_eq!(
            t.release(FINGER, start + Duration::from_millis(120)),
            Some(PressEvent::Tap {
                pointer: FINGER,
                card: "tasks".into()
            })
        );
    }

    #[test]
    fn second_pointer_is_ignored() {
        let mut t = tracker();
        let start = Instant::now();
        t.begin(FINGER, "tasks".into(), Point::default(), start);

        assert!(!t.begin(OTHER, "schedule".into(), Point::default(), start));
        assert_eq!(t.moved(OTHER, Point::new(100.0, 0.0), start), None);
        assert_eq!(t.release(OTHER, start), None);
        assert_eq!(t.pending_pointer(), Some(FINGER));
    }

    #[test]
    fn cancel_only_matches_owner() {
        let mut t = tracker();
        t.begin(FINGER, "tasks".into(), Point::default(), Instant::now());
        assert_eq!(t.cancel(OTHER), None);
        assert_eq!(t.cancel(FINGER), Some(PressEvent::Cancelled { pointer: FINGER }));
    }
}

//! Layout engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default long-press duration before reorder mode starts
pub const DEFAULT_LONG_PRESS_MS: u64 = 500;

/// Default pointer travel that cancels a pending long-press
pub const DEFAULT_MOVE_TOLERANCE_PX: f64 = 8.0;

/// Default lifetime of a transient notification
pub const DEFAULT_TOAST_TTL_MS: u64 = 4_000;

/// Default capacity of the dashboard event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Layout engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Press duration that enters reorder mode, in milliseconds
    pub long_press_ms: u64,
    /// Pointer travel that cancels a pending press, in pixels
    pub move_tolerance_px: f64,
    /// Lifetime of a transient notification, in milliseconds
    pub toast_ttl_ms: u64,
}

impl LayoutConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With long-press duration
    #[inline]
    #[must_use]
    pub fn with_long_press(mut self, duration: Duration) -> Self {
        self.long_press_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With movement tolerance
    #[inline]
    #[must_use]
    pub fn with_move_tolerance(mut self, px: f64) -> Self {
        self.move_tolerance_px = px;
        self
    }

    /// With notification lifetime
    #[inline]
    #[must_use]
    pub fn with_toast_ttl(mut self, ttl: Duration) -> Self {
        self.toast_ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Long-press duration
    #[inline]
    #[must_use]
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    /// Notification lifetime
    #[inline]
    #[must_use]
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            move_tolerance_px: DEFAULT_MOVE_TOLERANCE_PX,
            toast_ttl_ms: DEFAULT_TOAST_TTL_MS,
        }
    }
}

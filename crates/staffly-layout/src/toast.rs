//! Transient, auto-dismissing notifications

use std::time::{Duration, Instant};

/// Identifier of a queued notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

/// A notification that disappears on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Identifier for manual dismissal
    pub id: ToastId,
    /// Text shown to the user
    pub message: String,
    /// Moment the toast disappears
    pub expires_at: Instant,
}

/// Queue of live notifications
#[derive(Debug, Clone)]
pub struct ToastQueue {
    ttl: Duration,
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastQueue {
    /// Create queue whose toasts live for `ttl`
    #[inline]
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 0,
            items: Vec::new(),
        }
    }

    /// Queue a message
    pub fn push(&mut self, message: impl Into<String>, now: Instant) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        self.items.push(Toast {
            id,
            message: message.into(),
            expires_at: now + self.ttl,
        });
        id
    }

    /// Drop expired toasts and return the ones still showing
    pub fn active(&mut self, now: Instant) -> Vec<Toast> {
        self.items.retain(|t| t.expires_at > now);
        self.items.clone()
    }

    /// Dismiss a toast before it expires
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_ttl() {
        let mut queue = ToastQueue::new(Duration::from_secs(4));
        let now = Instant::now();
        queue.push("saved", now);

        assert_eq!(queue.active(now + Duration::from_secs(3)).len(), 1);
        assert!(queue.active(now + Duration::from_secs(4)).is_empty());
    }

    #[test]
    fn dismiss_removes_only_target() {
        let mut queue = ToastQueue::new(Duration::from_secs(4));
        let now = Instant::now();
        let first = queue.push("one", now);
        queue.push("two", now);

        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        let left = queue.active(now);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].message, "two");
    }
}

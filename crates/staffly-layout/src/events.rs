//! Dashboard event bus
//!
//! Components that care about layout or inbox changes subscribe to an
//! injected [`EventBus`] instead of listening on ambient globals.
//!
//! | name | payload |
//! |------|---------|
//! | `layout-changed` | `restaurant`, `layout` |
//! | `layout-persist-failed` | `restaurant`, `message` |
//! | `inbox-changed` | `restaurant` |

use crate::layout::Layout;
use serde::Serialize;
use staffly_access::RestaurantId;
use tokio::sync::broadcast;

/// Events published on the dashboard bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum DashboardEvent {
    /// The displayed layout changed (load, save, revert, availability)
    LayoutChanged {
        /// Restaurant whose dashboard changed
        restaurant: RestaurantId,
        /// New displayed order
        layout: Layout,
    },
    /// Saving the layout failed and the display was reverted
    LayoutPersistFailed {
        /// Restaurant whose save failed
        restaurant: RestaurantId,
        /// Text shown to the user
        message: String,
    },
    /// Inbox content changed and badges should refresh
    InboxChanged {
        /// Restaurant whose inbox changed
        restaurant: RestaurantId,
    },
}

impl DashboardEvent {
    /// Documented event name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LayoutChanged { .. } => "layout-changed",
            Self::LayoutPersistFailed { .. } => "layout-persist-failed",
            Self::InboxChanged { .. } => "inbox-changed",
        }
    }

    /// Restaurant the event concerns
    #[inline]
    #[must_use]
    pub fn restaurant(&self) -> &RestaurantId {
        match self {
            Self::LayoutChanged { restaurant, .. }
            | Self::LayoutPersistFailed { restaurant, .. }
            | Self::InboxChanged { restaurant } => restaurant,
        }
    }
}

/// Broadcast bus for [`DashboardEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    /// Create bus buffering up to `capacity` events per slow subscriber
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events published from now on
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; returns the number of subscribers reached
    pub fn publish(&self, event: DashboardEvent) -> usize {
        let name = event.name();
        match self.sender.send(event) {
            Ok(reached) => reached,
            Err(_) => {
                tracing::trace!(event = name, "no subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EVENT_CAPACITY)
    }
}

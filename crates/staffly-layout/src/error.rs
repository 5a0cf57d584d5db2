//! Error types for the layout engine

use staffly_access::RestaurantId;

/// Message shown when a save fails without a server explanation
pub const DEFAULT_PERSIST_MESSAGE: &str = "Couldn't save the dashboard order. Please try again.";

/// Errors from layout loading and persistence
#[derive(Debug, Clone, thiserror::Error)]
pub enum LayoutError {
    /// The layout endpoint answered with a failure
    #[error("layout request failed ({}): {}", status_label(.status), .message.as_deref().unwrap_or("no details"))]
    Remote {
        /// HTTP status, when a response arrived
        status: Option<u16>,
        /// Server-provided explanation
        message: Option<String>,
    },

    /// The request never completed
    #[error("layout request could not be sent: {0}")]
    Transport(String),

    /// The response body did not have the expected shape
    #[error("malformed layout response: {0}")]
    Malformed(String),

    /// A save failed; the displayed layout was reverted
    #[error("failed to save layout for restaurant {restaurant}")]
    PersistFailed {
        /// Restaurant whose layout was being saved
        restaurant: RestaurantId,
        /// Server-provided explanation
        message: Option<String>,
    },
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "no status".to_string(), |s| s.to_string())
}

impl LayoutError {
    /// Create remote error
    pub fn remote(status: Option<u16>, message: Option<String>) -> Self {
        Self::Remote { status, message }
    }

    /// Human-readable explanation suitable for a notification, if any
    #[inline]
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } | Self::PersistFailed { message, .. } => {
                message.as_deref()
            }
            Self::Transport(_) | Self::Malformed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_display() {
        let err = LayoutError::remote(Some(503), Some("maintenance".into()));
        assert_eq!(err.to_string(), "layout request failed (503): maintenance");
        assert_eq!(err.user_message(), Some("maintenance"));
    }

    #[test]
    fn remote_without_details() {
        let err = LayoutError::remote(None, None);
        assert_eq!(err.to_string(), "layout request failed (no status): no details");
        assert_eq!(err.user_message(), None);
    }

    #[test]
    fn transport_has_no_user_message() {
        assert_eq!(LayoutError::Transport("dns".into()).user_message(), None);
    }
}

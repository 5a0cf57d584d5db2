//! Error types for the dashboard session

use staffly_access::AccessError;
use staffly_layout::LayoutError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors from session synchronization
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Gathering access inputs failed or was declined
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Layout request failed
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A newer synchronization started before this one finished
    #[error("superseded by a newer session context")]
    Superseded,
}

impl SessionError {
    /// Declined for missing sign-in or restaurant, not a fault
    #[inline]
    #[must_use]
    pub fn is_guard(&self) -> bool {
        matches!(self, Self::Access(err) if err.is_guard())
    }

    /// Result was discarded in favour of a newer context
    #[inline]
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

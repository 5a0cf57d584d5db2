//! Error types for access resolution
//!
//! Resolution itself never fails; errors only come from the collaborators
//! that supply its inputs (session and membership lookup).

use crate::ids::RestaurantId;

/// Errors raised while gathering access inputs
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// No signed-in user
    #[error("not authenticated")]
    NotAuthenticated,

    /// Membership lookup failed
    #[error("membership lookup failed for restaurant {restaurant}: {message}")]
    MembershipLookup {
        /// Restaurant whose membership was requested
        restaurant: RestaurantId,
        /// Failure reported by the lookup
        message: String,
    },
}

impl AccessError {
    /// Create membership lookup error
    pub fn membership_lookup(restaurant: RestaurantId, message: impl Into<String>) -> Self {
        Self::MembershipLookup {
            restaurant,
            message: message.into(),
        }
    }

    /// Guard failures are declined operations rather than faults
    #[inline]
    #[must_use]
    pub fn is_guard(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_lookup_display() {
        let err = AccessError::membership_lookup(RestaurantId::new("r-9"), "timed out");
        assert_eq!(
            err.to_string(),
            "membership lookup failed for restaurant r-9: timed out"
        );
        assert!(!err.is_guard());
    }

    #[test]
    fn guards_are_flagged() {
        assert!(AccessError::NotAuthenticated.is_guard());
    }
}

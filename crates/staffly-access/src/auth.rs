//! Current session state
//!
//! The authentication service is a black box; the client only needs a
//! synchronous read of who is signed in and which restaurant is selected.

use crate::ids::{RestaurantId, UserId};
use crate::role::RoleSet;
use serde::{Deserialize, Serialize};

/// Snapshot of the signed-in session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Signed-in user
    pub user_id: UserId,
    /// Raw global roles; entries may be missing
    #[serde(default)]
    pub roles: Vec<Option<String>>,
    /// Currently selected restaurant
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
}

impl AuthState {
    /// Create session state for a user with no roles and no restaurant
    #[inline]
    #[must_use]
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            roles: Vec::new(),
            restaurant_id: None,
        }
    }

    /// With global roles
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(|r| Some(r.into())).collect();
        self
    }

    /// With a selected restaurant
    #[inline]
    #[must_use]
    pub fn with_restaurant(mut self, restaurant: impl Into<RestaurantId>) -> Self {
        self.restaurant_id = Some(restaurant.into());
        self
    }

    /// Normalized global roles
    #[must_use]
    pub fn global_roles(&self) -> RoleSet {
        self.roles.iter().flatten().collect()
    }
}

/// Synchronous source of the current session
pub trait AuthProvider: Send + Sync {
    /// Current session, or `None` when signed out
    fn current(&self) -> Option<AuthState>;
}

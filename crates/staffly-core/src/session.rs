//! Dashboard session
//!
//! Wires the signed-in user through membership lookup and access
//! resolution into the set of visible cards, and keeps the layout engine
//! pointed at the current restaurant.
//!
//! # Flow
//!
//! ```text
//! auth ──▶ restaurant changed? ──yes──▶ role lookup ──▶ access ──▶ engine.load
//!                   └──────────no──────▶ role lookup ──▶ access ──▶ engine.set_available
//! ```
//!
//! Role lookups are tagged with a generation; an answer that arrives after
//! a newer [`DashboardSession::sync`] started is discarded.

use crate::error::{SessionError, SessionResult};
use crate::visibility::available_cards;
use parking_lot::Mutex;
use serde::Serialize;
use staffly_access::{
    AccessError, AccessSummary, AuthProvider, MembershipCache, RestaurantId, RoleToken, UserId,
};
use staffly_client::{ClientConfig, ClientResult, HttpBackend};
use staffly_layout::{
    CardId, DashboardEvent, EventBus, Layout, LayoutApi, LayoutConfig, LayoutEngine, LoadOutcome,
    Phase,
};
use std::fmt;
use std::sync::Arc;

/// State of the session after a [`DashboardSession::sync`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Signed-in user
    pub user: UserId,
    /// Selected restaurant, if any
    pub restaurant: Option<RestaurantId>,
    /// Resolved capabilities
    pub access: AccessSummary,
    /// Cards the user may see
    pub available: Vec<CardId>,
    /// Displayed card order
    pub layout: Layout,
    /// Non-fatal layout load failure
    pub load_error: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    generation: u64,
    restaurant: Option<RestaurantId>,
    restaurant_role: Option<RoleToken>,
    role_error: Option<String>,
}

/// One user's dashboard for the currently selected restaurant
pub struct DashboardSession {
    auth: Arc<dyn AuthProvider>,
    membership: MembershipCache,
    engine: LayoutEngine,
    state: Mutex<SessionState>,
}

impl DashboardSession {
    /// Create session; call [`DashboardSession::sync`] to load it
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        membership: MembershipCache,
        layout_api: Arc<dyn LayoutApi>,
        config: &LayoutConfig,
        events: EventBus,
    ) -> Self {
        Self {
            auth,
            membership,
            engine: LayoutEngine::new(layout_api, config, events),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Session backed by the REST API described by `config`
    ///
    /// # Errors
    /// Returns error if the HTTP backend cannot be built
    pub fn connect(config: &ClientConfig, auth: Arc<dyn AuthProvider>) -> ClientResult<Self> {
        let backend = Arc::new(HttpBackend::new(config)?);
        let membership = MembershipCache::with_capacity(backend.clone(), config.cache_capacity);
        Ok(Self::new(
            auth,
            membership,
            backend,
            &config.layout,
            EventBus::default(),
        ))
    }

    /// Bring the session in line with the current auth state.
    ///
    /// # Arguments
    /// * `force` - Refresh the membership role instead of using the cache
    ///
    /// A restaurant switch reloads the layout; otherwise only the set of
    /// available cards is reconciled. A failed role lookup degrades to no
    /// restaurant role.
    ///
    /// # Errors
    /// - [`AccessError::NotAuthenticated`] when signed out (the session is cleared)
    /// - [`SessionError::Superseded`] when a newer sync overtook this one
    pub async fn sync(&self, force: bool) -> SessionResult<SessionSnapshot> {
        let Some(auth) = self.auth.current() else {
            self.clear();
            self.membership.invalidate_all();
            return Err(AccessError::NotAuthenticated.into());
        };

        let Some(restaurant) = auth.restaurant_id.clone() else {
            tracing::debug!(user = %auth.user_id, "no restaurant selected");
            self.clear();
            return Ok(self.snapshot(auth.user_id));
        };

        let (generation, switched) = {
            let mut state = self.state.lock();
            state.generation += 1;
            let switched = state.restaurant.as_ref() != Some(&restaurant);
            if switched {
                state.restaurant = Some(restaurant.clone());
                state.restaurant_role = None;
                state.role_error = None;
            }
            (state.generation, switched)
        };

        let (role, role_error) = match self.membership.role_for(&restaurant, force).await {
            Ok(role) => (role, None),
            Err(err) => {
                tracing::warn!(%restaurant, error = %err, "membership lookup failed, assuming no restaurant role");
                (None, Some(err.to_string()))
            }
        };

        {
            let mut state = self.state.lock();
            if state.generation != generation {
                tracing::warn!(%restaurant, "discarding membership for superseded context");
                return Err(SessionError::Superseded);
            }
            state.restaurant_role = role;
            state.role_error = role_error;
        }

        let available = available_cards(&self.access());
        let reload = switched
            || self.engine.restaurant().as_ref() != Some(&restaurant)
            || self.engine.phase() == Phase::Loading;
        if reload {
            if self.engine.load(restaurant, available).await == LoadOutcome::Superseded {
                return Err(SessionError::Superseded);
            }
        } else {
            self.engine.set_available(available);
        }

        if self.state.lock().generation != generation {
            return Err(SessionError::Superseded);
        }
        Ok(self.snapshot(auth.user_id))
    }

    /// Access summary, recomputed from the current auth state and the
    /// cached restaurant role
    #[must_use]
    pub fn access(&self) -> AccessSummary {
        let Some(auth) = self.auth.current() else {
            return AccessSummary::none();
        };
        let state = self.state.lock();
        let role = state
            .restaurant_role
            .clone()
            .filter(|_| state.restaurant == auth.restaurant_id);
        AccessSummary::from_roles(&auth.global_roles(), role)
    }

    /// Cards the caller may currently see
    #[must_use]
    pub fn available(&self) -> Vec<CardId> {
        available_cards(&self.access())
    }

    /// Current restaurant context
    #[must_use]
    pub fn restaurant(&self) -> Option<RestaurantId> {
        self.state.lock().restaurant.clone()
    }

    /// Non-fatal failure of the last role lookup
    #[must_use]
    pub fn role_error(&self) -> Option<String> {
        self.state.lock().role_error.clone()
    }

    /// Notify subscribers that the inbox of the current restaurant changed.
    ///
    /// Returns `false` when there is no restaurant context.
    pub fn mark_inbox_changed(&self) -> bool {
        let Some(restaurant) = self.restaurant() else {
            return false;
        };
        tracing::debug!(%restaurant, "inbox changed");
        self.engine
            .events()
            .publish(DashboardEvent::InboxChanged { restaurant });
        true
    }

    /// Layout engine of this session
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Event bus of this session
    #[inline]
    #[must_use]
    pub fn events(&self) -> &EventBus {
        self.engine.events()
    }

    fn clear(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.restaurant = None;
        state.restaurant_role = None;
        state.role_error = None;
        drop(state);
        self.engine.reset();
    }

    fn snapshot(&self, user: UserId) -> SessionSnapshot {
        let access = self.access();
        SessionSnapshot {
            user,
            restaurant: self.restaurant(),
            available: available_cards(&access),
            access,
            layout: self.engine.layout(),
            load_error: self.engine.load_error(),
        }
    }
}

impl fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardSession")
            .field("state", &*self.state.lock())
            .field("membership", &self.membership)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

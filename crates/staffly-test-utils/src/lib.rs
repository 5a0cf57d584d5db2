//! Testing utilities for the Staffly workspace
//!
//! In-memory fakes for the remote collaborators, with call recording and
//! scripted failures.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use staffly_access::{AccessError, AuthProvider, AuthState, MembershipSource, RestaurantId};
use staffly_layout::{CardId, LayoutApi, LayoutError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn cards(raw: &[&str]) -> Vec<CardId> {
    raw.iter().copied().map(CardId::from).collect()
}

/// In-memory layout endpoint
#[derive(Debug, Default)]
pub struct FakeLayoutApi {
    stored: Mutex<HashMap<RestaurantId, Vec<CardId>>>,
    saves: Mutex<Vec<(RestaurantId, Vec<CardId>)>>,
    held: Mutex<HashMap<RestaurantId, Arc<Notify>>>,
    fetch_calls: AtomicUsize,
    fail_fetch: AtomicBool,
    save_error: Mutex<Option<LayoutError>>,
}

impl FakeLayoutApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_layout(restaurant: &str, layout: &[&str]) -> Arc<Self> {
        let api = Self::new();
        api.store(restaurant, layout);
        api
    }

    pub fn store(&self, restaurant: &str, layout: &[&str]) {
        self.stored
            .lock()
            .insert(RestaurantId::new(restaurant), cards(layout));
    }

    pub fn stored(&self, restaurant: &str) -> Option<Vec<CardId>> {
        self.stored.lock().get(&RestaurantId::new(restaurant)).cloned()
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Fail every save with `error` until cleared with `None`
    pub fn fail_saves(&self, error: Option<LayoutError>) {
        *self.save_error.lock() = error;
    }

    /// Block fetches for `restaurant` until the returned handle is notified
    pub fn hold_fetches(&self, restaurant: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.held
            .lock()
            .insert(RestaurantId::new(restaurant), notify.clone());
        notify
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.saves.lock().len()
    }

    pub fn saves(&self) -> Vec<(RestaurantId, Vec<CardId>)> {
        self.saves.lock().clone()
    }
}

#[async_trait]
impl LayoutApi for FakeLayoutApi {
    async fn fetch_layout(&self, restaurant: &RestaurantId) -> Result<Vec<CardId>, LayoutError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let held = self.held.lock().get(restaurant).cloned();
        if let Some(notify) = held {
            notify.notified().await;
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(LayoutError::remote(Some(500), None));
        }
        Ok(self.stored.lock().get(restaurant).cloned().unwrap_or_default())
    }

    async fn save_layout(
        &self,
        restaurant: &RestaurantId,
        layout: &[CardId],
    ) -> Result<Vec<CardId>, LayoutError> {
        self.saves.lock().push((restaurant.clone(), layout.to_vec()));

        if let Some(err) = self.save_error.lock().clone() {
            return Err(err);
        }
        self.stored.lock().insert(restaurant.clone(), layout.to_vec());
        Ok(layout.to_vec())
    }
}

/// In-memory membership lookup
#[derive(Debug, Default)]
pub struct FakeMembershipSource {
    roles: Mutex<HashMap<RestaurantId, String>>,
    held: Mutex<HashMap<RestaurantId, Arc<Notify>>>,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl FakeMembershipSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_role(restaurant: &str, role: &str) -> Arc<Self> {
        let source = Self::new();
        source.set_role(restaurant, Some(role));
        source
    }

    pub fn set_role(&self, restaurant: &str, role: Option<&str>) {
        let mut roles = self.roles.lock();
        match role {
            Some(role) => roles.insert(RestaurantId::new(restaurant), role.to_string()),
            None => roles.remove(&RestaurantId::new(restaurant)),
        };
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Block the next lookup for `restaurant` until the returned handle is
    /// notified. The answer is read before blocking, so it reflects the
    /// role at call time.
    pub fn hold_next(&self, restaurant: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.held
            .lock()
            .insert(RestaurantId::new(restaurant), notify.clone());
        notify
    }
}

#[async_trait]
impl MembershipSource for FakeMembershipSource {
    async fn fetch_role(&self, restaurant: &RestaurantId) -> Result<Option<String>, AccessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = if self.fail.load(Ordering::SeqCst) {
            Err(AccessError::membership_lookup(restaurant.clone(), "unreachable"))
        } else {
            Ok(self.roles.lock().get(restaurant).cloned())
        };

        let held = self.held.lock().remove(restaurant);
        if let Some(notify) = held {
            notify.notified().await;
        }
        answer
    }
}

/// Auth provider with a swappable session
#[derive(Debug, Default)]
pub struct StaticAuth {
    state: Mutex<Option<AuthState>>,
}

impl StaticAuth {
    pub fn signed_in(state: AuthState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(Some(state)),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, state: Option<AuthState>) {
        *self.state.lock() = state;
    }
}

impl AuthProvider for StaticAuth {
    fn current(&self) -> Option<AuthState> {
        self.state.lock().clone()
    }
}

//! Membership lookup and its cache
//!
//! The caller's role inside a restaurant comes from a remote lookup. Results
//! are memoized per restaurant for the lifetime of the [`MembershipCache`],
//! which the caller owns and passes around explicitly. A `force` lookup
//! bypasses and refreshes the cached entry.
//!
//! Failed lookups are never cached. A non-forced lookup that finishes after
//! another lookup already filled the entry keeps the existing value.

use crate::error::AccessError;
use crate::ids::RestaurantId;
use crate::role::RoleToken;
use async_trait::async_trait;
use moka::future::Cache;
use std::fmt;
use std::sync::Arc;

/// Default number of restaurants remembered
pub const DEFAULT_CAPACITY: u64 = 1_024;

/// Remote source of the caller's per-restaurant role
#[async_trait]
pub trait MembershipSource: Send + Sync {
    /// Fetch the raw role the caller holds in `restaurant`.
    ///
    /// `Ok(None)` means the caller is not a member.
    async fn fetch_role(&self, restaurant: &RestaurantId) -> Result<Option<String>, AccessError>;
}

/// Caller-owned cache of per-restaurant roles
#[derive(Clone)]
pub struct MembershipCache {
    source: Arc<dyn MembershipSource>,
    inner: Cache<RestaurantId, Option<RoleToken>>,
}

impl MembershipCache {
    /// Create cache with default capacity
    #[inline]
    #[must_use]
    pub fn new(source: Arc<dyn MembershipSource>) -> Self {
        Self::with_capacity(source, DEFAULT_CAPACITY)
    }

    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn with_capacity(source: Arc<dyn MembershipSource>, max_capacity: u64) -> Self {
        Self {
            source,
            inner: Cache::new(max_capacity),
        }
    }

    /// Role the caller holds in `restaurant`.
    ///
    /// # Arguments
    /// * `restaurant` - Restaurant to look up
    /// * `force` - Skip the cached value and refresh it from the source
    ///
    /// # Errors
    /// Propagates the source's error; nothing is cached in that case.
    pub async fn role_for(
        &self,
        restaurant: &RestaurantId,
        force: bool,
    ) -> Result<Option<RoleToken>, AccessError> {
        if force {
            self.inner.invalidate(restaurant).await;
        } else if let Some(cached) = self.inner.get(restaurant).await {
            tracing::debug!(%restaurant, "membership cache hit");
            return Ok(cached);
        }

        let raw = self.source.fetch_role(restaurant).await?;
        let role = raw.as_deref().and_then(RoleToken::parse);
        tracing::debug!(%restaurant, role = ?role, force, "membership fetched");

        if force {
            self.inner.insert(restaurant.clone(), role.clone()).await;
            return Ok(role);
        }
        let entry = self.inner.entry(restaurant.clone()).or_insert(role).await;
        Ok(entry.into_value())
    }

    /// Peek at a cached role without touching the source
    #[inline]
    pub async fn cached(&self, restaurant: &RestaurantId) -> Option<Option<RoleToken>> {
        self.inner.get(restaurant).await
    }

    /// Forget one restaurant
    #[inline]
    pub async fn invalidate(&self, restaurant: &RestaurantId) {
        self.inner.invalidate(restaurant).await;
    }

    /// Forget everything, e.g. on sign-out
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl fmt::Debug for MembershipCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MembershipCache")
            .field("entry_count", &self.inner.entry_count())
            .finish_non_exhaustive()
    }
}

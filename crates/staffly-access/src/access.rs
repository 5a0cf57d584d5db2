//! Access resolution
//!
//! Turns global roles plus an optional restaurant role into an
//! [`AccessSummary`]. The summary always satisfies the privilege ladder
//! `is_creator ⇒ is_admin_like ⇒ is_manager_like`.

use crate::role::{well_known, RoleSet, RoleToken};
use serde::Serialize;

/// Capability summary derived from the caller's roles.
///
/// Recomputed from its inputs whenever they change; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AccessSummary {
    /// Holds the global `CREATOR` role
    pub is_creator: bool,
    /// Creator, global admin, or admin of the current restaurant
    pub is_admin_like: bool,
    /// Admin-like, global manager/supervisor, or manager of the current restaurant
    pub is_manager_like: bool,
    /// Normalized role inside the current restaurant, if known
    pub normalized_restaurant_role: Option<RoleToken>,
}

impl AccessSummary {
    /// Summary with no special access
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolve from an already-normalized role set
    #[must_use]
    pub fn from_roles(global: &RoleSet, restaurant_role: Option<RoleToken>) -> Self {
        let restaurant_is = |token: &str| restaurant_role.as_ref().is_some_and(|r| r.is(token));

        let is_creator = global.contains(well_known::CREATOR);

        let is_admin_like = is_creator
            || global.contains_any(&[well_known::ADMIN, well_known::SUPER_ADMIN])
            || restaurant_is(well_known::ADMIN);

        let is_manager_like = is_admin_like
            || global.contains_any(&[well_known::MANAGER, well_known::SUPERVISOR])
            || restaurant_is(well_known::MANAGER);

        Self {
            is_creator,
            is_admin_like,
            is_manager_like,
            normalized_restaurant_role: restaurant_role,
        }
    }

    /// Highest rung of the privilege ladder reached
    #[inline]
    #[must_use]
    pub fn level(&self) -> AccessLevel {
        if self.is_creator {
            AccessLevel::Creator
        } else if self.is_admin_like {
            AccessLevel::Admin
        } else if self.is_manager_like {
            AccessLevel::Manager
        } else {
            AccessLevel::Member
        }
    }

    /// Check whether the summary reaches at least `level`
    #[inline]
    #[must_use]
    pub fn at_least(&self, level: AccessLevel) -> bool {
        self.level() >= level
    }
}

/// Ordered privilege ladder (Member < Manager < Admin < Creator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AccessLevel {
    /// No special access
    Member,
    /// Manager-like access
    Manager,
    /// Admin-like access
    Admin,
    /// Creator access
    Creator,
}

impl AccessLevel {
    /// Lowercase label for display
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Member => "member",
            AccessLevel::Manager => "manager",
            AccessLevel::Admin => "admin",
            AccessLevel::Creator => "creator",
        }
    }
}

/// Resolve the access summary for a caller.
///
/// # Arguments
/// * `global_roles` - Raw global role strings in any spelling
/// * `restaurant_role` - Raw role inside the current restaurant, if any
///
/// Unusable input degrades to "no special access"; this never fails.
pub fn resolve_access<I, S>(global_roles: I, restaurant_role: Option<&str>) -> AccessSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let global = RoleSet::from_tokens(global_roles);
    let restaurant_role = restaurant_role.and_then(RoleToken::parse);
    AccessSummary::from_roles(&global, restaurant_role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NO_ROLES: [&str; 0] = [];

    #[test]
    fn namespaced_admin_is_admin_like() {
        let access = resolve_access(["ROLE_ADMIN"], None);
        assert!(access.is_admin_like);
        assert!(access.is_manager_like);
        assert!(!access.is_creator);
        assert_eq!(access.level(), AccessLevel::Admin);
    }

    #[test]
    fn restaurant_manager_is_manager_only() {
        let access = resolve_access(NO_ROLES, Some("MANAGER"));
        assert!(access.is_manager_like);
        assert!(!access.is_admin_like);
        assert!(!access.is_creator);
        assert_eq!(
            access.normalized_restaurant_role.as_ref().map(RoleToken::as_str),
            Some("MANAGER")
        );
    }

    #[test]
    fn missing_inputs_grant_nothing() {
        let global: Option<Vec<Option<String>>> = None;
        let access = resolve_access(global.iter().flatten().flatten(), None);
        assert_eq!(access, AccessSummary::none());
        assert_eq!(access.normalized_restaurant_role, None);
        assert_eq!(access.level(), AccessLevel::Member);
    }

    #[test]
    fn restaurant_admin_elevates_staff() {
        let access = resolve_access(["STAFF"], Some("ADMIN"));
        assert!(access.is_admin_like);
        assert!(access.is_manager_like);
        assert!(!access.is_creator);
    }

    #[test]
    fn creator_tops_the_ladder() {
        let access = resolve_access(["creator"], None);
        assert!(access.is_creator && access.is_admin_like && access.is_manager_like);
        assert!(access.at_least(AccessLevel::Admin));
    }

    #[test]
    fn super_admin_and_supervisor_spellings() {
        assert!(resolve_access(["super-admin"], None).is_admin_like);
        let supervisor = resolve_access(["ROLE_SUPERVISOR"], None);
        assert!(supervisor.is_manager_like);
        assert!(!supervisor.is_admin_like);
    }

    #[test]
    fn unparseable_restaurant_role_is_dropped() {
        let access = resolve_access(NO_ROLES, Some("  "));
        assert_eq!(access.normalized_restaurant_role, None);
        assert!(!access.is_manager_like);
    }

    #[test]
    fn creator_in_restaurant_scope_is_not_creator() {
        let access = resolve_access(NO_ROLES, Some("CREATOR"));
        assert!(!access.is_creator);
        assert!(!access.is_manager_like);
    }

    fn raw_role() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("creator".to_string()),
            Just("ROLE_ADMIN".to_string()),
            Just("super-admin".to_string()),
            Just("manager".to_string()),
            Just("Supervisor".to_string()),
            Just("staff".to_string()),
            Just(String::new()),
            "[a-zA-Z_ -]{0,12}",
        ]
    }

    proptest! {
        #[test]
        fn prop_privilege_ladder_is_monotonic(
            global in proptest::collection::vec(raw_role(), 0..6),
            restaurant in proptest::option::of(raw_role()),
        ) {
            let access = resolve_access(&global, restaurant.as_deref());
            prop_assert!(!access.is_creator || access.is_admin_like);
            prop_assert!(!access.is_admin_like || access.is_manager_like);
        }

        #[test]
        fn prop_resolution_is_stable(
            global in proptest::collection::vec(raw_role(), 0..6),
            restaurant in proptest::option::of(raw_role()),
        ) {
            let first = resolve_access(&global, restaurant.as_deref());
            let second = resolve_access(&global, restaurant.as_deref());
            prop_assert_eq!(first, second);
        }
    }
}

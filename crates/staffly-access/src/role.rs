//! Role token normalization
//!
//! Role strings reach the client in several spellings: `admin`,
//! `ROLE_ADMIN`, ` Super-Admin `. Everything is folded into one canonical
//! token before any comparison:
//!
//! 1. trim surrounding whitespace
//! 2. uppercase, folding `-` and inner whitespace to `_`
//! 3. strip one leading `ROLE_` namespace marker
//! 4. reject empty tokens and tokens outside `[A-Z0-9_]`

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Namespace marker some backends prepend to role names
const NAMESPACE_PREFIX: &str = "ROLE_";

/// Role tokens the resolver knows about
pub mod well_known {
    /// Restaurant creator / owner
    pub const CREATOR: &str = "CREATOR";
    /// Administrator
    pub const ADMIN: &str = "ADMIN";
    /// Platform-wide administrator
    pub const SUPER_ADMIN: &str = "SUPER_ADMIN";
    /// Manager
    pub const MANAGER: &str = "MANAGER";
    /// Shift supervisor
    pub const SUPERVISOR: &str = "SUPERVISOR";
    /// Regular staff member
    pub const STAFF: &str = "STAFF";
}

/// Normalize a raw role string into its canonical form.
///
/// Returns `None` when nothing usable is left.
#[must_use]
pub fn normalize_role(raw: &str) -> Option<String> {
    let folded: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c == '-' || c.is_whitespace() {
                '_'
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect();

    let token = folded.strip_prefix(NAMESPACE_PREFIX).unwrap_or(&folded);

    let valid = !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');

    valid.then(|| token.to_owned())
}

/// A normalized role token
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RoleToken(String);

impl RoleToken {
    /// Parse and normalize a raw role string
    #[inline]
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        normalize_role(raw).map(Self)
    }

    /// Canonical token text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check against a canonical token such as [`well_known::ADMIN`]
    #[inline]
    #[must_use]
    pub fn is(&self, token: &str) -> bool {
        self.0 == token
    }
}

impl fmt::Display for RoleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplicated set of normalized global roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleSet {
    tokens: BTreeSet<RoleToken>,
}

impl RoleSet {
    /// Empty set (no special access)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize every raw token, dropping the unusable ones
    pub fn from_tokens<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = raw
            .into_iter()
            .filter_map(|r| RoleToken::parse(r.as_ref()))
            .collect();
        Self { tokens }
    }

    /// Check for a canonical token
    #[inline]
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.is(token))
    }

    /// Check for any of several canonical tokens
    #[inline]
    #[must_use]
    pub fn contains_any(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|t| self.contains(t))
    }

    /// Iterate in canonical (sorted) order
    pub fn iter(&self) -> impl Iterator<Item = &RoleToken> {
        self.tokens.iter()
    }

    /// Number of distinct tokens
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when no usable token was supplied
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_namespace_and_case() {
        assert_eq!(normalize_role("ROLE_ADMIN").as_deref(), Some("ADMIN"));
        assert_eq!(normalize_role("role_manager").as_deref(), Some("MANAGER"));
        assert_eq!(normalize_role("  staff ").as_deref(), Some("STAFF"));
    }

    #[test]
    fn normalize_folds_separators() {
        assert_eq!(normalize_role("super-admin").as_deref(), Some("SUPER_ADMIN"));
        assert_eq!(normalize_role("Super Admin").as_deref(), Some("SUPER_ADMIN"));
        assert_eq!(normalize_role("ROLE_super-admin").as_deref(), Some("SUPER_ADMIN"));
    }

    #[test]
    fn normalize_rejects_empty_and_invalid() {
        assert_eq!(normalize_role(""), None);
        assert_eq!(normalize_role("   "), None);
        assert_eq!(normalize_role("ROLE_"), None);
        assert_eq!(normalize_role("admin!"), None);
        assert_eq!(normalize_role("gérant"), None);
    }

    #[test]
    fn prefix_is_stripped_once() {
        assert_eq!(normalize_role("ROLE_ROLE_ADMIN").as_deref(), Some("ROLE_ADMIN"));
    }

    #[test]
    fn role_set_deduplicates() {
        let set = RoleSet::from_tokens(["admin", "ROLE_ADMIN", " Admin ", "", "staff"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(well_known::ADMIN));
        assert!(set.contains(well_known::STAFF));
        assert!(!set.contains(well_known::CREATOR));
    }

    #[test]
    fn role_set_collects_from_optional_entries() {
        let raw: Vec<Option<String>> = vec![Some("manager".into()), None, Some("ROLE_".into())];
        let set: RoleSet = raw.iter().flatten().collect();
        assert_eq!(set.len(), 1);
        assert!(set.contains_any(&[well_known::MANAGER, well_known::SUPERVISOR]));
    }
}

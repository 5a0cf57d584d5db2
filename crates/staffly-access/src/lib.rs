//! Staffly Access
//!
//! Client-side access resolution. Combines a user's global roles with the
//! role they hold inside one restaurant into a small capability summary
//! that decides which views and actions the UI offers.
//!
//! The backend remains the enforcement point: everything here is advisory.
//!
//! # Core Concepts
//!
//! - [`RoleToken`] / [`RoleSet`]: normalized, deduplicated role tokens
//! - [`resolve_access`]: pure resolution into an [`AccessSummary`]
//! - [`MembershipCache`]: explicit, caller-owned cache of per-restaurant roles
//! - [`AuthProvider`]: synchronous read of the current session
//!
//! # Example
//!
//! ```rust
//! use staffly_access::resolve_access;
//!
//! let access = resolve_access(["ROLE_STAFF"], Some("admin"));
//! assert!(access.is_admin_like);
//! assert!(access.is_manager_like);
//! assert!(!access.is_creator);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod access;
pub mod auth;
pub mod error;
pub mod ids;
pub mod membership;
pub mod role;

pub use access::{resolve_access, AccessLevel, AccessSummary};
pub use auth::{AuthProvider, AuthState};
pub use error::AccessError;
pub use ids::{RestaurantId, UserId};
pub use membership::{MembershipCache, MembershipSource};
pub use role::{normalize_role, well_known, RoleSet, RoleToken};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

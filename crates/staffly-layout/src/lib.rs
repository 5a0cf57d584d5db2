//! Staffly Layout
//!
//! Ordering of the dashboard cards for one restaurant.
//!
//! # Core Concepts
//!
//! - [`CardId`] / [`DEFAULT_ORDER`]: card identifiers and their canonical order
//! - [`Layout`]: ordered, duplicate-free card sequence
//! - [`reconcile`]: normalize any incoming order against the available cards
//! - [`reorder`]: move-and-shift a card onto another's slot
//! - [`LayoutEngine`]: load, drag-reorder and optimistically persist a layout
//! - [`EventBus`]: injected publisher of `layout-changed` and friends
//!
//! # Example
//!
//! ```rust,ignore
//! use staffly_layout::{default_order, EventBus, LayoutConfig, LayoutEngine};
//!
//! let engine = LayoutEngine::new(api, &LayoutConfig::default(), EventBus::default());
//! engine.load(restaurant, default_order()).await;
//!
//! engine.begin_drag(pointer, "schedule".into());
//! engine.drag_over(pointer, &"employees".into());
//! engine.drag_end(pointer, Some(&"employees".into())).await;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod api;
pub mod card;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod gesture;
pub mod layout;
pub mod optimistic;
pub mod toast;

pub use api::{LayoutApi, LayoutPayload};
pub use card::{default_order, CardId, DEFAULT_ORDER};
pub use config::LayoutConfig;
pub use engine::{LayoutEngine, LoadOutcome, Mode, PersistOutcome, Phase};
pub use error::LayoutError;
pub use events::{DashboardEvent, EventBus};
pub use gesture::{Point, PointerId, PressEvent, PressTracker};
pub use layout::{reconcile, reorder, Layout};
pub use optimistic::OptimisticLayout;
pub use toast::{Toast, ToastId, ToastQueue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

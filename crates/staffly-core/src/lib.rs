//! Staffly Core
//!
//! The dashboard session: who is signed in, what they may see, and the
//! order their cards are shown in.
//!
//! # Core Concepts
//!
//! - [`DashboardSession`]: auth → membership → access → visible cards → layout
//! - [`available_cards`]: card visibility by access level
//!
//! # Example
//!
//! ```rust,ignore
//! use staffly_core::DashboardSession;
//!
//! let session = DashboardSession::connect(&config, auth)?;
//! let snapshot = session.sync(false).await?;
//! println!("{:?}", snapshot.layout);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod session;
pub mod visibility;

pub use error::{SessionError, SessionResult};
pub use session::{DashboardSession, SessionSnapshot};
pub use visibility::{available_cards, required_level};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Staffly Client
//!
//! Everything that talks to the outside world on behalf of the dashboard.
//!
//! # Core Concepts
//!
//! - [`ClientConfig`]: TOML configuration with environment overrides
//! - [`HttpBackend`]: REST implementation of the layout and membership lookups
//! - [`Preferences`]: per-device theme and banner dismissal
//! - [`logging`]: subscriber setup for binaries
//!
//! # Example
//!
//! ```rust,ignore
//! use staffly_client::{ClientConfig, HttpBackend};
//! use std::sync::Arc;
//!
//! let config = ClientConfig::load("staffly.toml")?;
//! let backend = Arc::new(HttpBackend::new(&config)?);
//! let layout = backend.fetch_layout(&"r-1".into()).await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod preferences;

pub use config::{ClientConfig, SessionConfig};
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use logging::LogFormat;
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences, Theme,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

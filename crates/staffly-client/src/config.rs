//! Client configuration
//!
//! Loaded from a TOML file, then overridden from the environment:
//!
//! | variable | field |
//! |----------|-------|
//! | `STAFFLY_API_URL` | `base_url` |
//! | `STAFFLY_TOKEN` | `token` |
//! | `STAFFLY_RESTAURANT` | `session.restaurant` |
//!
//! # Example
//!
//! ```toml
//! base_url = "https://api.staffly.app"
//! token = "..."
//!
//! [session]
//! user_id = "u-1"
//! restaurant = "r-1"
//! roles = ["ROLE_STAFF"]
//!
//! [layout]
//! long_press_ms = 450
//! ```

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use staffly_access::membership::DEFAULT_CAPACITY;
use staffly_access::{AuthState, RestaurantId};
use staffly_layout::LayoutConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding [`ClientConfig::base_url`]
pub const ENV_API_URL: &str = "STAFFLY_API_URL";

/// Environment variable overriding [`ClientConfig::token`]
pub const ENV_TOKEN: &str = "STAFFLY_TOKEN";

/// Environment variable overriding [`SessionConfig::restaurant`]
pub const ENV_RESTAURANT: &str = "STAFFLY_RESTAURANT";

/// Default API root
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Signed-in identity used when no interactive login is available
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// User id
    pub user_id: Option<String>,
    /// Selected restaurant
    pub restaurant: Option<String>,
    /// Raw global role tokens
    pub roles: Vec<String>,
}

impl SessionConfig {
    /// Session state, or `None` when no user is configured
    #[must_use]
    pub fn auth_state(&self) -> Option<AuthState> {
        let user = self.user_id.as_deref()?;
        let mut state = AuthState::new(user).with_roles(self.roles.iter().cloned());
        if let Some(restaurant) = &self.restaurant {
            state = state.with_restaurant(RestaurantId::new(restaurant.as_str()));
        }
        Some(state)
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Per-request timeout in seconds; the HTTP client default (none) when unset
    pub timeout_secs: Option<u64>,
    /// JSON file backing local preferences; in-memory when absent
    pub preferences_path: Option<PathBuf>,
    /// Membership cache capacity
    pub cache_capacity: u64,
    /// Layout engine tuning
    pub layout: LayoutConfig,
    /// Configured identity
    pub session: SessionConfig,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file and apply environment overrides
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated
    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ClientError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ClientError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded client config");
        let config = config.with_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file
    ///
    /// # Errors
    /// Returns error if the overridden values are invalid
    pub fn from_env() -> ClientResult<Self> {
        let config = Self::default().with_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`; empty values are ignored
    #[must_use]
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_API_URL) {
            self.base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(restaurant) = lookup(ENV_RESTAURANT) {
            self.session.restaurant = Some(restaurant);
        }
        self
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// Returns error for an empty or non-http base URL, an explicit zero
    /// timeout or a zero cache capacity
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ClientError::invalid_config("base_url must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::invalid_config(format!(
                "base_url must be an http(s) URL, got {url}"
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(ClientError::invalid_config("timeout_secs must be positive"));
        }
        if self.cache_capacity == 0 {
            return Err(ClientError::invalid_config("cache_capacity must be positive"));
        }
        Ok(())
    }

    /// With API root
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// With bearer token
    #[inline]
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// With preference file
    #[inline]
    #[must_use]
    pub fn with_preferences_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preferences_path = Some(path.into());
        self
    }

    /// With selected restaurant
    #[inline]
    #[must_use]
    pub fn with_restaurant(mut self, restaurant: impl Into<String>) -> Self {
        self.session.restaurant = Some(restaurant.into());
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs().max(1));
        self
    }

    /// Request timeout, if one was configured
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// API root without trailing slashes
    #[inline]
    #[must_use]
    pub fn api_root(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            user_agent: format!("staffly/{}", crate::VERSION),
            timeout_secs: None,
            preferences_path: None,
            cache_capacity: DEFAULT_CAPACITY,
            layout: LayoutConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), None);
        assert_eq!(config.cache_capacity, 1_024);
        assert!(config.user_agent.starts_with("staffly/"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            base_url = "https://api.staffly.test/"

            [session]
            user_id = "u-1"
            roles = ["ROLE_MANAGER"]

            [layout]
            long_press_ms = 450
            "#,
        )
        .unwrap();

        assert_eq!(config.api_root(), "https://api.staffly.test");
        assert_eq!(config.layout.long_press_ms, 450);
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.session.roles, vec!["ROLE_MANAGER".to_string()]);
    }

    #[test]
    fn env_overrides_file_values() {
        let config = ClientConfig::new()
            .with_token("from-file")
            .with_env_overrides(env(&[
                (ENV_API_URL, "https://override.test"),
                (ENV_TOKEN, "from-env"),
                (ENV_RESTAURANT, "r-7"),
            ]));

        assert_eq!(config.base_url, "https://override.test");
        assert_eq!(config.token.as_deref(), Some("from-env"));
        assert_eq!(config.session.restaurant.as_deref(), Some("r-7"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = ClientConfig::new()
            .with_token("kept")
            .with_env_overrides(env(&[(ENV_TOKEN, "  ")]));
        assert_eq!(config.token.as_deref(), Some("kept"));
    }

    #[test]
    fn rejects_unusable_values() {
        assert!(ClientConfig::new().with_base_url("").validate().is_err());
        assert!(ClientConfig::new()
            .with_base_url("ftp://files")
            .validate()
            .is_err());

        let mut config = ClientConfig::new();
        config.cache_capacity = 0;
        assert!(config.validate().unwrap_err().is_config());

        let mut config = ClientConfig::new();
        config.timeout_secs = Some(0);
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn timeout_is_opt_in() {
        let config: ClientConfig = toml::from_str("timeout_secs = 12").unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(12)));

        let config = ClientConfig::new().with_timeout(Duration::from_millis(200));
        assert_eq!(config.timeout(), Some(Duration::from_secs(1)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn preferences_path_is_optional() {
        assert_eq!(ClientConfig::default().preferences_path, None);

        let config = ClientConfig::new().with_preferences_path("/tmp/staffly/prefs.json");
        assert_eq!(
            config.preferences_path.as_deref(),
            Some(Path::new("/tmp/staffly/prefs.json"))
        );
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = \"soon\"").unwrap();

        let err = ClientConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ClientError::ConfigParse { .. }));
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let err = ClientConfig::load("/nonexistent/staffly.toml").unwrap_err();
        assert!(matches!(err, ClientError::ConfigRead { .. }));
    }

    #[test]
    fn session_builds_auth_state() {
        let session = SessionConfig {
            user_id: Some("u-1".into()),
            restaurant: Some("r-1".into()),
            roles: vec!["ROLE_ADMIN".into()],
        };
        let state = session.auth_state().unwrap();
        assert_eq!(state.restaurant_id, Some(RestaurantId::new("r-1")));
        assert_eq!(state.global_roles().len(), 1);

        assert!(SessionConfig::default().auth_state().is_none());
    }
}

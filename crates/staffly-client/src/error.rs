//! Error types for the client layer

use std::path::PathBuf;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from configuration, preferences and HTTP setup
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::ClientConfig`]
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration is structurally valid but unusable
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Preference file could not be read or written
    #[error("preference store I/O on {path}: {source}")]
    Preferences {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Preference values could not be encoded
    #[error("preference encoding failed: {0}")]
    PreferenceEncoding(#[from] serde_json::Error),

    /// HTTP client could not be built
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Create invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the error came from the configuration file
    #[inline]
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_display() {
        let err = ClientError::invalid_config("base_url must not be empty");
        assert_eq!(err.to_string(), "invalid config: base_url must not be empty");
        assert!(err.is_config());
    }

    #[test]
    fn io_errors_keep_path() {
        let err = ClientError::Preferences {
            path: PathBuf::from("/tmp/prefs.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/prefs.json"));
        assert!(!err.is_config());
    }
}

//! Local preferences
//!
//! Small per-device settings that never go to the server: the colour
//! theme and whether a user dismissed the announcements banner for a
//! restaurant. A missing or unreadable value always reads as the default.
//!
//! Keys:
//! - `staffly.theme`
//! - `staffly.announcements-dismissed.{restaurant}.{user}`

use crate::error::{ClientError, ClientResult};
use parking_lot::Mutex;
use staffly_access::{RestaurantId, UserId};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Key of the theme preference
pub const THEME_KEY: &str = "staffly.theme";

const DISMISSED_PREFIX: &str = "staffly.announcements-dismissed";

/// String key/value storage
pub trait PreferenceStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Delete a value; deleting a missing key is not an error
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// Volatile store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object
///
/// The whole file is rewritten on every change.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts empty; a corrupt file is ignored and will be
    /// replaced on the next write.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable preferences");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(ClientError::Preferences { path, source }),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> ClientResult<()> {
        let encoded = serde_json::to_string_pretty(values)?;
        let io_err = |source: std::io::Error| ClientError::Preferences {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, encoded).map_err(io_err)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut values = self.values.lock();
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&values)
    }
}

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Light
    Light,
    /// Dark
    Dark,
    /// Follow the operating system
    #[default]
    System,
}

impl Theme {
    /// Stored representation
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ClientError::invalid_config(format!("unknown theme: {other}"))),
        }
    }
}

/// Typed access to the preference keys
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn PreferenceStore>,
}

impl Preferences {
    /// Wrap a store
    #[must_use]
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// In-memory preferences
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryPreferenceStore::new()))
    }

    /// Preferences at `path`, or in memory when no path is given
    ///
    /// # Errors
    /// Returns error if an existing file cannot be read
    pub fn open(path: Option<&Path>) -> ClientResult<Self> {
        match path {
            Some(path) => Ok(Self::new(Arc::new(FilePreferenceStore::open(path)?))),
            None => Ok(Self::in_memory()),
        }
    }

    /// Current theme
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Store theme
    ///
    /// # Errors
    /// Returns error if the store cannot be written
    pub fn set_theme(&self, theme: Theme) -> ClientResult<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Whether `user` dismissed the announcements banner in `restaurant`
    #[must_use]
    pub fn announcements_dismissed(&self, restaurant: &RestaurantId, user: &UserId) -> bool {
        self.store
            .get(&dismissed_key(restaurant, user))
            .is_some_and(|raw| raw == "true")
    }

    /// Remember that `user` dismissed the banner in `restaurant`
    ///
    /// # Errors
    /// Returns error if the store cannot be written
    pub fn dismiss_announcements(&self, restaurant: &RestaurantId, user: &UserId) -> ClientResult<()> {
        self.store.set(&dismissed_key(restaurant, user), "true")
    }

    /// Show the banner again
    ///
    /// # Errors
    /// Returns error if the store cannot be written
    pub fn restore_announcements(&self, restaurant: &RestaurantId, user: &UserId) -> ClientResult<()> {
        self.store.remove(&dismissed_key(restaurant, user))
    }
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

fn dismissed_key(restaurant: &RestaurantId, user: &UserId) -> String {
    format!("{DISMISSED_PREFIX}.{restaurant}.{user}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (RestaurantId, UserId) {
        (RestaurantId::new("r-1"), UserId::new("u-1"))
    }

    #[test]
    fn theme_defaults_to_system() {
        let prefs = Preferences::in_memory();
        assert_eq!(prefs.theme(), Theme::System);

        prefs.set_theme(Theme::Dark).unwrap();
        assert_eq!(prefs.theme(), Theme::Dark);
    }

    #[test]
    fn garbage_theme_reads_as_default() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(Preferences::new(store).theme(), Theme::System);
    }

    #[test]
    fn theme_parsing_is_case_insensitive() {
        assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("purple".parse::<Theme>().is_err());
    }

    #[test]
    fn dismissal_is_scoped_per_restaurant_and_user() {
        let prefs = Preferences::in_memory();
        let (restaurant, user) = ids();

        assert!(!prefs.announcements_dismissed(&restaurant, &user));
        prefs.dismiss_announcements(&restaurant, &user).unwrap();

        assert!(prefs.announcements_dismissed(&restaurant, &user));
        assert!(!prefs.announcements_dismissed(&RestaurantId::new("r-2"), &user));
        assert!(!prefs.announcements_dismissed(&restaurant, &UserId::new("u-2")));

        prefs.restore_announcements(&restaurant, &user).unwrap();
        assert!(!prefs.announcements_dismissed(&restaurant, &user));
    }

    #[test]
    fn dismissed_key_format() {
        let (restaurant, user) = ids();
        assert_eq!(
            dismissed_key(&restaurant, &user),
            "staffly.announcements-dismissed.r-1.u-1"
        );
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let (restaurant, user) = ids();

        {
            let prefs = Preferences::open(Some(path.as_path())).unwrap();
            prefs.set_theme(Theme::Light).unwrap();
            prefs.dismiss_announcements(&restaurant, &user).unwrap();
        }

        let prefs = Preferences::open(Some(path.as_path())).unwrap();
        assert_eq!(prefs.theme(), Theme::Light);
        assert!(prefs.announcements_dismissed(&restaurant, &user));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(store.get(THEME_KEY), None);

        store.set(THEME_KEY, "dark").unwrap();
        let reopened = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn removing_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::open(dir.path().join("prefs.json")).unwrap();
        store.remove("staffly.nothing").unwrap();
        assert!(!store.path().exists());
    }
}

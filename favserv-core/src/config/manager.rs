//! Locates the config directory and reads/writes `settings.toml`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::store::FavoritesStore;
use crate::tracing::span_names;

use super::settings::AppSettings;

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "FAVSERV_CONFIG_DIR";

/// Name of the settings file inside the config directory
pub const SETTINGS_FILE: &str = "settings.toml";

const APP_DIR_NAME: &str = "favserv";

/// Manages the configuration directory
///
/// Everything favserv persists lives in one directory: `settings.toml` and
/// the favorites file named by [`FavoritesSettings`](super::FavoritesSettings).
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the default config directory
    ///
    /// Uses `$FAVSERV_CONFIG_DIR` when set, otherwise `favserv` under the
    /// platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if neither is available.
    pub fn new() -> ConfigResult<Self> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_config_dir(PathBuf::from(dir)));
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(APP_DIR_NAME)))
    }

    /// Creates a manager for an explicit directory
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// The config directory
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of `settings.toml`
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Path of the favorites file named in `settings`
    #[must_use]
    pub fn favorites_path(&self, settings: &AppSettings) -> PathBuf {
        self.config_dir.join(&settings.favorites.file_name)
    }

    /// Opens the favorites store named in `settings` and loads it
    #[must_use]
    pub fn open_favorites(&self, settings: &AppSettings) -> FavoritesStore {
        FavoritesStore::open(self.favorites_path(settings))
    }

    /// Creates the config directory if needed
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> ConfigResult<()> {
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })
    }

    /// Loads `settings.toml`; a missing file yields the defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read and
    /// [`ConfigError::Parse`] if it is not valid settings TOML.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        let path = self.settings_path();
        let _span = tracing::debug_span!(span_names::CONFIG_LOAD, path = %path.display()).entered();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings file, using defaults");
                return Ok(AppSettings::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path,
            reason: e.to_string(),
        })
    }

    /// Writes `settings` to `settings.toml`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] or [`ConfigError::Io`] on failure.
    pub fn save_settings(&self, settings: &AppSettings) -> ConfigResult<()> {
        self.ensure_config_dir()?;
        let content =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        let path = self.settings_path();
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Saved settings");
        Ok(())
    }
}

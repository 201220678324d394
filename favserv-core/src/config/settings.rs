//! Application settings stored in `settings.toml`

use serde::{Deserialize, Serialize};

use crate::tracing::TracingLevel;

/// Default file name of the favorites file inside the config directory
pub const DEFAULT_FAVORITES_FILE: &str = "FavoriteServers.json";

/// Steam app id whose cloud saves hold the identity files
pub const DEFAULT_APP_ID: &str = "892970";

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// General settings
    pub general: GeneralSettings,
    /// Panel placement
    pub ui: UiSettings,
    /// Favorites file settings
    pub favorites: FavoritesSettings,
    /// Where to look for identity save data
    pub identities: IdentitySettings,
    /// How the CLI starts a connection
    pub launch: LaunchSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// General settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Key that toggles the favorites panel in UI hosts
    pub toggle_hotkey: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            toggle_hotkey: "F6".to_string(),
        }
    }
}

/// Panel placement; negative coordinates center the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Horizontal position of the favorites panel
    pub window_pos_x: f32,
    /// Vertical position of the favorites panel
    pub window_pos_y: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            window_pos_x: -1.0,
            window_pos_y: -1.0,
        }
    }
}

impl UiSettings {
    /// Returns true if the panel should be centered instead of placed
    #[must_use]
    pub fn is_centered(&self) -> bool {
        self.window_pos_x < 0.0 || self.window_pos_y < 0.0
    }
}

/// Favorites file settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FavoritesSettings {
    /// File name inside the config directory
    pub file_name: String,
}

impl Default for FavoritesSettings {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FAVORITES_FILE.to_string(),
        }
    }
}

/// Identity lookup locations
///
/// Unset locations fall back to the platform defaults. Paths may start with
/// `~`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    /// Local directory holding identity files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_dir: Option<String>,
    /// Steam installation roots searched for cloud saves
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cloud_roots: Vec<String>,
    /// Steam app id of the cloud save folder
    pub app_id: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            local_dir: None,
            cloud_roots: Vec::new(),
            app_id: DEFAULT_APP_ID.to_string(),
        }
    }
}

/// How the CLI hands a resolved endpoint to the game
///
/// `args` may contain `{address}`, `{port}` and `{endpoint}` placeholders.
/// With no program the endpoint is printed instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    /// Program to spawn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Arguments passed to the program
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level name (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingSettings {
    /// Parsed level; unknown names fall back to info
    #[must_use]
    pub fn tracing_level(&self) -> TracingLevel {
        self.level.parse().unwrap_or_default()
    }
}

//! Configuration management for `favserv`
//!
//! This module provides the [`ConfigManager`], which locates the config
//! directory and loads and saves [`AppSettings`] in TOML format.

mod manager;
pub mod settings;

pub use manager::{CONFIG_DIR_ENV, ConfigManager, SETTINGS_FILE};
pub use settings::{
    AppSettings, DEFAULT_APP_ID, DEFAULT_FAVORITES_FILE, FavoritesSettings, GeneralSettings,
    IdentitySettings, LaunchSettings, LoggingSettings, UiSettings,
};

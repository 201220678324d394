//! Shared utility functions used across command modules.

use std::path::Path;

use favserv_core::config::{AppSettings, ConfigManager};
use favserv_core::store::FavoritesStore;

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads `settings.toml`, or defaults if it does not exist yet
pub fn load_settings(config_path: Option<&Path>) -> Result<AppSettings, CliError> {
    create_config_manager(config_path)?
        .load_settings()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))
}

/// Loads settings and opens the favorites store they name
pub fn open_store(config_path: Option<&Path>) -> Result<(AppSettings, FavoritesStore), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let settings = config_manager
        .load_settings()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))?;
    let store = config_manager.open_favorites(&settings);
    Ok((settings, store))
}

/// Retries the save if the store's automatic save after a mutation failed
pub fn ensure_saved(store: &mut FavoritesStore) -> Result<(), CliError> {
    if store.is_dirty() {
        store.save()?;
    }
    Ok(())
}

/// Renders a boolean for human-readable output
pub const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

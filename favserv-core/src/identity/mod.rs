//! Character (identity) lookup
//!
//! Identities are the player profiles a server record may name as its
//! preferred identity. They are found by scanning save-data directories for
//! `*.fch` files: one local directory plus the Steam cloud-sync folders
//! `<steam-root>/userdata/<user>/<app-id>/remote/characters`. Every directory
//! is scanned independently; one that is missing or unreadable contributes
//! nothing.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{DEFAULT_APP_ID, IdentitySettings};
use crate::tracing::span_names;

/// Extension of identity save files
pub const IDENTITY_EXTENSION: &str = "fch";

/// Returns true if a file stem names a backup rather than a live identity
#[must_use]
pub fn is_backup_name(stem: &str) -> bool {
    stem.contains("_backup") || stem.ends_with(".old") || stem.ends_with(".bak")
}

/// Read-only query over the identity save directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterLookup {
    local_dir: Option<PathBuf>,
    cloud_roots: Vec<PathBuf>,
    app_id: String,
}

impl CharacterLookup {
    /// Creates a lookup over a single local directory
    #[must_use]
    pub fn new(local_dir: impl Into<PathBuf>) -> Self {
        Self {
            local_dir: Some(local_dir.into()),
            cloud_roots: Vec::new(),
            app_id: DEFAULT_APP_ID.to_string(),
        }
    }

    /// Creates a lookup over the platform's default locations
    #[must_use]
    pub fn platform_default() -> Self {
        Self {
            local_dir: default_local_dir(),
            cloud_roots: default_cloud_roots(),
            app_id: DEFAULT_APP_ID.to_string(),
        }
    }

    /// Creates a lookup from settings, filling unset locations with the
    /// platform defaults
    #[must_use]
    pub fn from_settings(settings: &IdentitySettings) -> Self {
        let local_dir = settings
            .local_dir
            .as_deref()
            .map(expand_path)
            .or_else(default_local_dir);
        let cloud_roots = if settings.cloud_roots.is_empty() {
            default_cloud_roots()
        } else {
            settings.cloud_roots.iter().map(|p| expand_path(p)).collect()
        };
        Self {
            local_dir,
            cloud_roots,
            app_id: settings.app_id.clone(),
        }
    }

    /// Adds a Steam installation root to search for cloud saves
    #[must_use]
    pub fn with_cloud_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cloud_roots.push(root.into());
        self
    }

    /// Sets the Steam app id of the cloud save folder
    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Every directory that may hold identity files, in scan order
    ///
    /// Cloud directories are enumerated from the `userdata` folder of each
    /// root; roots without one contribute nothing.
    #[must_use]
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self.local_dir.iter().cloned().collect();

        for root in &self.cloud_roots {
            let userdata = root.join("userdata");
            let entries = match fs::read_dir(&userdata) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(path = %userdata.display(), error = %e, "Skipping cloud root");
                    continue;
                }
            };
            let mut users: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect();
            users.sort();
            dirs.extend(
                users
                    .into_iter()
                    .map(|user| user.join(&self.app_id).join("remote").join("characters")),
            );
        }
        dirs
    }

    /// Names of all available identities
    ///
    /// Names differing only in case are reported once, under the spelling
    /// found first. The result is sorted case-insensitively.
    #[must_use]
    pub fn list_available_identities(&self) -> Vec<String> {
        let _span = tracing::debug_span!(span_names::IDENTITY_SCAN).entered();

        let mut found: BTreeMap<String, String> = BTreeMap::new();
        for dir in self.search_dirs() {
            for name in scan_dir(&dir) {
                found.entry(name.to_lowercase()).or_insert(name);
            }
        }

        debug!(count = found.len(), "Identity scan finished");
        found.into_values().collect()
    }

    /// Returns true if an identity with this name exists, ignoring case
    #[must_use]
    pub fn identity_exists(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let wanted = name.to_lowercase();
        self.list_available_identities()
            .iter()
            .any(|candidate| candidate.to_lowercase() == wanted)
    }
}

/// Identity names in one directory
fn scan_dir(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if dir.exists() {
                warn!(path = %dir.display(), error = %e, "Could not read identity directory");
            }
            return Vec::new();
        }
    };

    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(IDENTITY_EXTENSION))
        })
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .filter(|stem| !stem.is_empty() && !is_backup_name(stem))
        .collect()
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(target_os = "windows")]
fn default_local_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join("AppData")
            .join("LocalLow")
            .join("IronGate")
            .join("Valheim")
            .join("characters_local")
    })
}

#[cfg(not(target_os = "windows"))]
fn default_local_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|config| {
        config
            .join("unity3d")
            .join("IronGate")
            .join("Valheim")
            .join("characters_local")
    })
}

#[cfg(target_os = "windows")]
fn default_cloud_roots() -> Vec<PathBuf> {
    [
        r"C:\Program Files (x86)\Steam",
        r"C:\Program Files\Steam",
        r"D:\Steam",
        r"D:\Program Files (x86)\Steam",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

#[cfg(target_os = "macos")]
fn default_cloud_roots() -> Vec<PathBuf> {
    dirs::data_dir()
        .map(|data| vec![data.join("Steam")])
        .unwrap_or_default()
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn default_cloud_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(data) = dirs::data_dir() {
        roots.push(data.join("Steam"));
    }
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".steam").join("steam"));
    }
    roots
}

//! Persisted user settings.
//!
//! Read from a flat JSON file. Missing or unparsable files yield defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::listing::SortSpec;
use crate::surface::ViewMode;

/// Error type for settings persistence.
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Settings I/O error: {}", e),
            Self::Json(e) => write!(f, "Settings JSON error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// User settings. Accepts both camelCase and snake_case keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(alias = "show_hidden_files", default = "default_show_hidden")]
    pub show_hidden_files: bool,
    #[serde(alias = "poll_interval_ms", default)]
    pub poll_interval_ms: Option<u64>,
    #[serde(alias = "default_sort", default)]
    pub default_sort: Option<SortSpec>,
    #[serde(alias = "view_mode", default)]
    pub view_mode: Option<ViewMode>,
}

fn default_show_hidden() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_hidden_files: true,
            poll_interval_ms: None,
            default_sort: None,
            view_mode: None,
        }
    }
}

/// `<config dir>/thumbview/settings.json`, or `None` when the platform has no config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("thumbview").join("settings.json"))
}

/// Loads settings from `path`. Returns defaults if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unparsable settings file {}: {}", path.display(), e);
                Settings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(e) => {
            log::warn!("Couldn't read settings file {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

/// Writes settings as pretty JSON, creating the parent directory if needed.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

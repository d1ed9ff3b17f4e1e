// Settings persistence for the replay tool.
// Uses platform-native config dir: e.g. ~/Library/Application Support/tabstrip/settings.json
// on macOS, ~/.config/tabstrip/settings.json on Linux.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tabstrip_core::StripMetrics;
use tabstrip_reorder::ReorderSettings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub layout: StripMetrics,
    #[serde(default)]
    pub reorder: ReorderSettings,
}

pub fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("tabstrip").join("settings.json"))
}

/// Missing files give defaults silently; unreadable ones give defaults with a warning.
pub fn load_settings_from(path: &Path) -> AppSettings {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                AppSettings::default()
            }
        },
        Err(_) => AppSettings::default(),
    }
}

pub fn load_settings() -> AppSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => AppSettings::default(),
    }
}

pub fn save_settings_to(settings: &AppSettings, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn save_settings(settings: &AppSettings) {
    let Some(path) = settings_path() else {
        log::warn!("Cannot determine settings path");
        return;
    };
    if let Err(e) = save_settings_to(settings, &path) {
        log::error!("Failed to write {}: {}", path.display(), e);
    }
}

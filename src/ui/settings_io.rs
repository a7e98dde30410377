use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::ui::settings::UiSettings;

const APP_DIR: &str = "holodeck_client";

fn config_path(file: &str) -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push(file);
    path
}

/// Missing or unreadable files give the defaults.
fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    let Ok(raw) = fs::read_to_string(path) else {
        debug!(path = %path.display(), "no settings file, using defaults");
        return T::default();
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
        T::default()
    })
}

pub fn load_client_config() -> ClientConfig {
    load_json(&config_path("client.json"))
}

pub fn load_settings() -> UiSettings {
    load_json::<UiSettings>(&config_path("ui_settings.json")).sanitized()
}

pub fn save_settings(settings: &UiSettings) {
    let path = config_path("ui_settings.json");
    if let Err(e) = write_json(&path, settings) {
        warn!(path = %path.display(), error = %e, "could not save ui settings");
    }
}

fn write_json(path: &Path, settings: &UiSettings) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ui_settings.json");

        let mut settings = UiSettings::default();
        settings.ui_scale = 1.25;
        write_json(&path, &settings).unwrap();

        let loaded: UiSettings = load_json(&path);
        assert_eq!(loaded.ui_scale, 1.25);
    }

    #[test]
    fn hand_edited_zero_scale_is_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_settings.json");
        fs::write(&path, r#"{"ui_scale":0}"#).unwrap();

        let loaded = load_json::<UiSettings>(&path).sanitized();
        assert_eq!(loaded.ui_scale, 0.75);
    }

    #[test]
    fn malformed_or_missing_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_json::<ClientConfig>(&path), ClientConfig::default());
        assert_eq!(
            load_json::<ClientConfig>(&dir.path().join("absent.json")),
            ClientConfig::default()
        );
    }
}

use egui::Key;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "framekit";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),

    #[error("Settings file {path} is malformed: {source}")]
    Corrupt {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to access settings file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "framekit".to_string(),
            width: 1024,
            height: 768,
            fullscreen: false,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub window: WindowSettings,
    /// Frames per second the app asks to be repainted at, `0` for uncapped.
    pub target_fps: u32,
    pub log_level: String,
    pub gamepads_enabled: bool,
    pub stats_interval_seconds: u64,
    pub quit_key: Key,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            target_fps: 60,
            log_level: "info".to_string(),
            gamepads_enabled: true,
            stats_interval_seconds: 30,
            quit_key: Key::Escape,
        }
    }
}

impl EngineSettings {
    /// Parses `log_level`, falling back to `INFO` for unknown names.
    pub fn tracing_level(&self) -> tracing::Level {
        match self.log_level.parse() {
            Ok(level) => level,
            Err(_) => {
                warn!("Unknown log level '{}', using info", self.log_level);
                tracing::Level::INFO
            }
        }
    }
}

/// `<config dir>/framekit/settings.toml`
pub fn settings_path() -> Result<PathBuf, SettingsError> {
    let mut path = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
    path.push(CONFIG_DIR);
    path.push(SETTINGS_FILE);
    Ok(path)
}

pub async fn load_settings(path: &Path) -> Result<EngineSettings, SettingsError> {
    debug!("Loading settings from {}", path.display());
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SettingsError::NotFound(path.to_path_buf()),
            _ => SettingsError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
    let settings = toml::from_str(&content).map_err(|e| SettingsError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Settings loaded from {}", path.display());
    Ok(settings)
}

pub async fn save_settings(path: &Path, settings: &EngineSettings) -> Result<(), SettingsError> {
    let io_error = |e| SettingsError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    let content = toml::to_string_pretty(settings)?;
    tokio::fs::write(path, content).await.map_err(io_error)?;
    info!("Settings saved to {}", path.display());
    Ok(())
}

/// Loads the settings at `path`, writing the defaults there first if the file does not exist.
pub async fn ensure_default_settings(path: &Path) -> Result<EngineSettings, SettingsError> {
    match load_settings(path).await {
        Err(SettingsError::NotFound(_)) => {
            info!("No settings at {}, writing defaults", path.display());
            let settings = EngineSettings::default();
            save_settings(path, &settings).await?;
            Ok(settings)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("framekit-settings-{}-{}", std::process::id(), name))
            .join(SETTINGS_FILE)
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let path = scratch("missing");
        let _ = tokio::fs::remove_file(&path).await;
        assert!(matches!(
            load_settings(&path).await,
            Err(SettingsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn malformed_file_is_corrupt() {
        let path = scratch("corrupt");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "target_fps = \"fast\"").await.unwrap();
        let result = load_settings(&path).await;
        let _ = tokio::fs::remove_file(&path).await;
        assert!(matches!(result, Err(SettingsError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn defaults_written_once() {
        let path = scratch("defaults");
        let _ = tokio::fs::remove_file(&path).await;

        let created = ensure_default_settings(&path).await.unwrap();
        assert_eq!(created, EngineSettings::default());
        assert!(tokio::fs::try_exists(&path).await.unwrap());

        let mut changed = created.clone();
        changed.target_fps = 144;
        changed.quit_key = Key::Q;
        save_settings(&path, &changed).await.unwrap();
        let loaded = ensure_default_settings(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;
        assert_eq!(loaded, changed);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let settings: EngineSettings = toml::from_str("[window]\ntitle = \"demo\"\n").unwrap();
        assert_eq!(settings.window.title, "demo");
        assert_eq!(settings.window.width, 1024);
        assert_eq!(settings.target_fps, 60);
        assert!(settings.gamepads_enabled);
    }

    #[test]
    fn unknown_log_level_falls_back() {
        let settings = EngineSettings {
            log_level: "chatty".into(),
            ..EngineSettings::default()
        };
        assert_eq!(settings.tracing_level(), tracing::Level::INFO);
        let settings = EngineSettings {
            log_level: "debug".into(),
            ..EngineSettings::default()
        };
        assert_eq!(settings.tracing_level(), tracing::Level::DEBUG);
    }
}

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

const APP_DIR_NAME: &str = ".tellmemore";

/// App directory (~/.tellmemore)
pub fn app_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// config.json path
pub fn config_json_path() -> PathBuf {
    app_dir().join("config.json")
}

/// preferences.json path (model and prompt selection)
pub fn preferences_json_path() -> PathBuf {
    app_dir().join("preferences.json")
}

/// Make sure the app directory exists
pub fn ensure_app_dir() -> std::io::Result<PathBuf> {
    let dir = app_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Load a JSON file into `T`
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save `value` as pretty JSON, creating parent directories
pub fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

//! Platform-specific configuration paths.
//!
//! - Linux: `~/.config/narrowband/config.toml`
//! - macOS: `~/Library/Application Support/narrowband/config.toml`
//! - Windows: `%APPDATA%\narrowband\config.toml`

use crate::ConfigError;
use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "narrowband";

/// Settings file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to `./narrowband` if the platform config directory cannot be
/// determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default settings file path.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_ends_with_app_and_file() {
        let path = default_config_path();
        assert!(path.ends_with("narrowband/config.toml"));
        assert_eq!(path.parent(), Some(user_config_dir().as_path()));
    }
}

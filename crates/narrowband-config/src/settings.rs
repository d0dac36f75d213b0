//! Settings file.

use crate::{ConfigError, paths};
use narrowband_analysis::WindowKind;
use narrowband_core::AdcConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest channel count a capture file may carry.
const MAX_CHANNELS: usize = 16;

/// Analysis defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Window name, matched case-insensitively.
    pub window: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            window: "hann".to_string(),
        }
    }
}

/// Everything the CLI reads from `config.toml`.
///
/// Missing tables and keys take their defaults, so an empty file is valid.
///
/// ```toml
/// [adc]
/// bits = 14
/// bipolar = true
/// sample_rate_mhz = 125.0
/// num_channels = 2
/// demo_board = "DC_1513B-AA"
/// device = "LTM9004"
///
/// [analysis]
/// window = "hann"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Receiver ADC description.
    pub adc: AdcConfig,
    /// Analysis defaults.
    pub analysis: AnalysisSettings,
}

impl Settings {
    /// Load and validate settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// Check the ADC description and the window name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.adc.validate()?;
        if !(1..=MAX_CHANNELS).contains(&self.adc.num_channels) {
            return Err(ConfigError::InvalidChannelCount(self.adc.num_channels));
        }
        self.window_kind()?;
        Ok(())
    }

    /// The configured analysis window.
    pub fn window_kind(&self) -> Result<WindowKind, ConfigError> {
        self.analysis
            .window
            .parse()
            .map_err(ConfigError::InvalidWindow)
    }

    /// File the settings would be read from: `explicit` if given, else the
    /// user config file if it exists.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let path = paths::default_config_path();
                path.is_file().then_some(path)
            }
        }
    }

    /// Load from [`Settings::locate`], or fall back to defaults when no file
    /// is found. An explicit path that cannot be read is an error.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::locate(explicit) {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("no settings file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, validating or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// `analysis.window` names no supported window
    #[error("invalid [analysis] window: {0}")]
    InvalidWindow(#[source] narrowband_analysis::Error),

    /// `[adc]` table rejected by the data model
    #[error("invalid [adc] settings: {0}")]
    InvalidAdc(#[from] narrowband_core::Error),

    /// `adc.num_channels` outside `1..=16`
    #[error("invalid [adc] num_channels: {0} (expected 1..=16)")]
    InvalidChannelCount(usize),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display_names_path() {
        let err = ConfigError::read_file("/a/config.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/config.toml"), "got: {msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn create_dir_keeps_path() {
        let err = ConfigError::create_dir("/dir/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::CreateDir { ref path, .. } if path == std::path::Path::new("/dir/path"))
        );
    }

    #[test]
    fn invalid_window_chains_source() {
        let inner = "bogus"
            .parse::<narrowband_analysis::WindowKind>()
            .unwrap_err();
        let err = ConfigError::InvalidWindow(inner);
        assert!(err.to_string().contains("bogus"));
        assert!(err.source().is_some());
    }

    #[test]
    fn channel_count_display() {
        let err = ConfigError::InvalidChannelCount(0);
        assert_eq!(
            err.to_string(),
            "invalid [adc] num_channels: 0 (expected 1..=16)"
        );
    }
}

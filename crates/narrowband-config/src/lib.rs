//! Settings for the narrowband measurement rig.
//!
//! A single TOML file describes the receiver ADC and analysis defaults. The
//! CLI reads it from `--config <FILE>`, else from the user config directory
//! (see [`paths`]), else uses [`Settings::default`]. Command-line flags
//! override whatever the file says.
//!
//! # Example
//!
//! ```rust,no_run
//! use narrowband_config::Settings;
//!
//! let settings = Settings::load_or_default(None).unwrap();
//! let window = settings.window_kind().unwrap();
//! println!("{} bits, {} window", settings.adc.bits, window);
//! ```

mod error;
mod settings;

/// Platform-specific configuration paths.
pub mod paths;

pub use error::ConfigError;
pub use paths::{default_config_path, ensure_user_config_dir, user_config_dir};
pub use settings::{AnalysisSettings, Settings};

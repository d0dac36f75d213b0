//! Shared CLI helpers used across multiple commands.

use narrowband_analysis::WindowKind;
use narrowband_config::Settings;
use narrowband_core::Capture;
use narrowband_io::{FileKind, PscopeRecord, read_record};
use std::path::Path;

/// Load settings from `--config`, the user config file, or defaults.
pub fn load_settings(config: Option<&Path>) -> anyhow::Result<Settings> {
    Ok(Settings::load_or_default(config)?)
}

/// `--window` if given, else the configured window.
pub fn resolve_window(flag: Option<WindowKind>, settings: &Settings) -> anyhow::Result<WindowKind> {
    match flag {
        Some(kind) => Ok(kind),
        None => Ok(settings.window_kind()?),
    }
}

/// `--bits` if given, else the bit depth recorded in the file, else settings.
pub fn resolve_bits(flag: Option<u32>, record: &PscopeRecord, settings: &Settings) -> u32 {
    flag.or(record.header.bits).unwrap_or(settings.adc.bits)
}

/// A capture read from an `.adc` file, with its header.
pub struct LoadedCapture {
    /// The file's header and raw matrix.
    pub record: PscopeRecord,
    /// Integer codes per channel.
    pub capture: Capture,
}

/// Read an `.adc` file and convert it to integer codes.
pub fn load_capture(path: &Path) -> anyhow::Result<LoadedCapture> {
    if FileKind::from_path(path) == FileKind::Fft {
        anyhow::bail!(
            "{} holds spectra, not a capture; pass the .adc file",
            path.display()
        );
    }
    let record = read_record(path)?;
    let capture = record.data.to_capture()?;
    tracing::info!(
        path = %path.display(),
        channels = capture.num_channels(),
        samples = capture.num_samples(),
        "loaded capture"
    );
    Ok(LoadedCapture { record, capture })
}

/// Format a dB value to one decimal; `-inf` prints as is.
pub fn format_db(value: f64) -> String {
    format!("{value:.1}")
}

/// Format a frequency in Hz with a metric prefix.
pub fn format_hz(hz: f64) -> String {
    if hz >= 1e6 {
        format!("{:.4} MHz", hz / 1e6)
    } else if hz >= 1e3 {
        format!("{:.3} kHz", hz / 1e3)
    } else {
        format!("{hz:.1} Hz")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_formatting() {
        assert_eq!(format_db(-1.76), "-1.8");
        assert_eq!(format_db(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn hz_formatting() {
        assert_eq!(format_hz(62.5e6), "62.5000 MHz");
        assert_eq!(format_hz(1500.0), "1.500 kHz");
        assert_eq!(format_hz(0.0), "0.0 Hz");
    }
}

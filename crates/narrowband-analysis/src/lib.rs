//! Narrowband Analysis - Spectra and quality metrics for ADC captures
//!
//! This crate turns raw integer ADC captures into calibrated measurements:
//!
//! - [`window`] - PScope-compatible cosine-sum windows
//! - [`fft`] - FFT wrapper over `rustfft`
//! - [`spectrum`] - dBFS magnitude spectra (DC removal, windowing, one-sided scaling)
//! - [`sinefit`] - Single-tone decomposition into fundamental, harmonics and noise
//! - [`metrics`] - SNR, THD, SINAD, ENOB, SFDR and noise floor in dBFS
//!
//! ## Spectrum
//!
//! ```rust,ignore
//! use narrowband_analysis::{spectrum, WindowKind};
//!
//! let kind: WindowKind = "hann".parse()?;
//! let dbfs = spectrum::analyze(&samples, 14, kind)?;
//! assert_eq!(dbfs.len(), samples.len() / 2 + 1);
//! ```
//!
//! ## Quality Metrics
//!
//! ```rust,ignore
//! use narrowband_analysis::metrics::{assess, QualityReport};
//!
//! match assess(&samples, 14)? {
//!     QualityReport::Signal { metrics, .. } => println!("SNR: {:.1} dB", metrics.snr_db),
//!     QualityReport::NoSignal => println!("No AC Signal Detected"),
//! }
//! ```

pub mod fft;
pub mod metrics;
pub mod sinefit;
pub mod spectrum;
pub mod window;

// Re-export main types
pub use fft::Fft;
pub use metrics::{HarmonicEntry, HarmonicTable, QualityMetrics, QualityReport, assess, compute};
pub use sinefit::{SineFit, fit};
pub use spectrum::{analyze, analyze_capture, find_peaks, frequency_axis};
pub use window::{WindowKind, generate};

/// Errors raised by spectral and metric analysis.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Window name not in the supported set.
    #[error("unknown window type '{0}' (expected one of: {names})", names = window::names())]
    InvalidWindowKind(String),

    /// Capture has no samples.
    #[error("capture is empty")]
    EmptyCapture,

    /// Spectrum analysis needs an even number of samples.
    #[error("capture length {0} is odd; spectrum analysis needs an even length")]
    OddLength(usize),

    /// Bit depth outside `1..=31`.
    #[error("invalid ADC bit depth: {0} (expected 1..=31)")]
    InvalidBits(u32),

    /// Too few samples to separate a tone from the DC region and noise.
    #[error("capture of {len} samples is too short for tone analysis (need at least {min})")]
    CaptureTooShort {
        /// Samples supplied.
        len: usize,
        /// Minimum accepted.
        min: usize,
    },

    /// No dominant single tone could be fitted.
    #[error("no coherent signal detected")]
    NoCoherentSignal,
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn check_bits(bits: u32) -> Result<()> {
    if (1..=31).contains(&bits) {
        Ok(())
    } else {
        Err(Error::InvalidBits(bits))
    }
}

/// Peak amplitude of a full-scale sine for `bits` of resolution.
pub fn full_scale(bits: u32) -> f64 {
    2f64.powi(bits as i32 - 1)
}

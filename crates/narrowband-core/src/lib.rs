//! Data model for the narrowband measurement rig.
//!
//! This crate provides the types shared by the analysis, file I/O and CLI
//! layers:
//!
//! - [`Capture`] - equal-length integer sample sequences, one per channel
//! - [`AdcConfig`] - bit depth, polarity, sample rate and board identifiers
//! - [`CaptureSource`] - the seam where receiver hardware plugs in
//! - [`ToneSource`] - deterministic synthetic capture source for tests and demos
//!
//! ## Example
//!
//! ```rust
//! use narrowband_core::{AdcConfig, CaptureSource, Tone, ToneSource};
//!
//! let mut source = ToneSource::new(AdcConfig::default())
//!     .with_tone(Tone::cycles(101.0, 1024, 4000.0))
//!     .with_tone(Tone::cycles(37.0, 1024, 2000.0));
//! let capture = source.capture(1024).unwrap();
//! assert_eq!(capture.num_channels(), 2);
//! assert_eq!(capture.num_samples(), 1024);
//! ```

mod adc;
mod capture;
mod source;

pub use adc::AdcConfig;
pub use capture::{Capture, channel_max, channel_mean, channel_min, linspace};
pub use source::{CaptureSource, Tone, ToneSource};

/// Errors raised while building or validating captures and ADC descriptions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A channel's length differs from the first channel's length.
    #[error("channel {channel} has {found} samples, expected {expected}")]
    LengthMismatch {
        /// Zero-based index of the offending channel.
        channel: usize,
        /// Length of the first channel.
        expected: usize,
        /// Length of the offending channel.
        found: usize,
    },

    /// A row-major sample row has the wrong number of columns.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },

    /// Bit depth outside the supported `1..=31` range.
    #[error("invalid ADC bit depth: {0} (expected 1..=31)")]
    InvalidBits(u32),

    /// Sample rate is not a positive finite number.
    #[error("invalid sample rate: {0} MHz")]
    InvalidSampleRate(f64),

    /// A board or device identifier cannot be stored in a CSV header field.
    #[error("invalid {field} identifier {value:?}: commas and line breaks are not allowed")]
    InvalidIdentifier {
        /// Which identifier (`demo_board` or `device`).
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Convenience result type for data-model operations.
pub type Result<T> = std::result::Result<T, Error>;

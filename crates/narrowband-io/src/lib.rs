//! PScope file I/O for the narrowband measurement rig.
//!
//! This crate reads and writes the CSV-like `.adc` (raw codes) and `.fft`
//! (dBFS magnitudes) containers understood by Linear Technology's PScope:
//!
//! - **Writing**: [`write_adc`] and [`write_fft`]
//! - **Reading**: [`read_data`] for the sample matrix, [`read_record`] for the
//!   matrix plus parsed header and time/frequency axis, [`read_header`] for
//!   the header alone
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use narrowband_core::{AdcConfig, CaptureSource, Tone, ToneSource};
//! use narrowband_io::{read_data, write_adc};
//!
//! let config = AdcConfig::default();
//! let capture = ToneSource::new(config.clone())
//!     .with_tone(Tone::cycles(101.0, 1024, 4000.0))
//!     .capture(1024)?;
//!
//! write_adc("capture.adc", &capture, &config)?;
//! let data = read_data("capture.adc")?;
//! assert_eq!(data.to_capture()?, capture);
//! ```

mod pscope;

pub use pscope::{
    Axis, FileKind, MAX_CHANNELS, PscopeData, PscopeHeader, PscopeRecord, fft_path_for,
    read_data, read_header, read_record, write_adc, write_fft,
};

/// Error types for PScope file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Channel count outside `1..=16`.
    #[error("pass in between 1 and {max} channels, got {0}", max = MAX_CHANNELS)]
    InvalidChannelCount(usize),

    /// A capture with no samples; its channels could not be read back.
    #[error("capture has no samples")]
    EmptyCapture,

    /// A spectrum does not have `num_samples/2 + 1` bins.
    #[error("spectrum for channel {channel} has {found} bins, expected {expected}")]
    SpectrumLength {
        /// Zero-based channel index.
        channel: usize,
        /// Required bin count.
        expected: usize,
        /// Bin count supplied.
        found: usize,
    },

    /// A data row could not be parsed.
    #[error("malformed record at line {line}: {content:?}")]
    MalformedRecord {
        /// One-based line number in the file.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// A required header row is absent.
    #[error("missing {0} header row")]
    MissingHeader(&'static str),

    /// An `.adc` value is not an integer code.
    #[error("channel {channel} sample {index} is not an integer code: {value}")]
    NonIntegralSample {
        /// Zero-based channel index.
        channel: usize,
        /// Zero-based sample index.
        index: usize,
        /// The value read.
        value: f64,
    },

    /// Capture or ADC description rejected by the data model.
    #[error(transparent)]
    Core(#[from] narrowband_core::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for PScope file operations.
pub type Result<T> = std::result::Result<T, Error>;

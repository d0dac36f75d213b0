//! ADC quality metrics in dBFS.
//!
//! Wraps [`sinefit::fit`](crate::sinefit::fit) and expresses the results
//! relative to the converter's full scale rather than to the fundamental.

use crate::sinefit::{self, NUM_HARMONICS};
use crate::{Error, Result, check_bits, full_scale};

/// One row of the harmonic table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HarmonicEntry {
    /// Power in squared codes; `sqrt(power)` is the component's peak amplitude.
    pub power: f64,
    /// Bin index where the component was found.
    pub bin: usize,
}

/// Fundamental and harmonics 2..=5, indexed by harmonic number.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarmonicTable {
    entries: [HarmonicEntry; NUM_HARMONICS],
}

impl HarmonicTable {
    /// Entry for harmonic `h` (1 = fundamental), or `None` outside `1..=5`.
    pub fn get(&self, h: usize) -> Option<&HarmonicEntry> {
        h.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// The fundamental.
    pub fn fundamental(&self) -> &HarmonicEntry {
        &self.entries[0]
    }

    /// `(harmonic number, entry)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &HarmonicEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }
}

impl From<&sinefit::SineFit> for HarmonicTable {
    fn from(fit: &sinefit::SineFit) -> Self {
        let mut entries = [HarmonicEntry::default(); NUM_HARMONICS];
        for (entry, c) in entries.iter_mut().zip(&fit.harmonics) {
            *entry = HarmonicEntry {
                power: c.power,
                bin: c.bin,
            };
        }
        Self { entries }
    }
}

/// Summary quality figures for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityMetrics {
    /// Bin of the fundamental.
    pub fundamental_bin: usize,
    /// Fundamental amplitude in dBFS.
    pub fundamental_dbfs: f64,
    /// Harmonics 2..=5 in dBFS (`-inf` when a harmonic has no power).
    pub harmonic_dbfs: [f64; 4],
    /// Signal-to-noise ratio (dB).
    pub snr_db: f64,
    /// Total harmonic distortion (dBc).
    pub thd_db: f64,
    /// Signal to noise and distortion (dB).
    pub sinad_db: f64,
    /// Effective number of bits.
    pub enob_bits: f64,
    /// Spurious-free dynamic range (dB).
    pub sfdr_db: f64,
    /// Noise floor per bin (dBFS).
    pub floor_dbfs: f64,
    /// Largest sample code.
    pub max_code: i32,
    /// Smallest sample code.
    pub min_code: i32,
    /// Mean sample code.
    pub dc_level: f64,
}

impl QualityMetrics {
    /// dBFS of harmonic `h` (1..=5).
    pub fn harmonic(&self, h: usize) -> Option<f64> {
        match h {
            1 => Some(self.fundamental_dbfs),
            2..=5 => Some(self.harmonic_dbfs[h - 2]),
            _ => None,
        }
    }
}

/// Outcome of assessing a capture.
#[derive(Debug, Clone, PartialEq)]
pub enum QualityReport {
    /// A dominant tone was fitted.
    Signal {
        /// Component powers and locations.
        harmonics: HarmonicTable,
        /// Derived figures.
        metrics: QualityMetrics,
    },
    /// The capture carries no usable AC signal.
    NoSignal,
}

/// `20*log10(sqrt(power) / 2^(bits-1))`; zero power maps to `-inf`.
pub fn power_to_dbfs(power: f64, bits: u32) -> f64 {
    if power == 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * (power.sqrt() / full_scale(bits)).log10()
}

/// Decompose a capture and derive its quality metrics.
///
/// Fails with [`Error::NoCoherentSignal`] when no tone can be fitted; use
/// [`assess`] to get that case as a value instead.
pub fn compute(samples: &[i32], bits: u32) -> Result<(HarmonicTable, QualityMetrics)> {
    check_bits(bits)?;
    let fit = sinefit::fit(samples)?;
    let table = HarmonicTable::from(&fit);

    let fundamental_dbfs = power_to_dbfs(fit.fundamental().power, bits);
    let mut harmonic_dbfs = [f64::NEG_INFINITY; 4];
    for (slot, c) in harmonic_dbfs.iter_mut().zip(&fit.harmonics[1..]) {
        *slot = power_to_dbfs(c.power, bits);
    }

    let metrics = QualityMetrics {
        fundamental_bin: fit.fundamental().bin,
        fundamental_dbfs,
        harmonic_dbfs,
        snr_db: fit.snr_db,
        thd_db: fit.thd_db,
        sinad_db: fit.sinad_db,
        enob_bits: fit.enob_bits,
        sfdr_db: fit.sfdr_db,
        floor_dbfs: fit.floor_dbc + fundamental_dbfs,
        max_code: narrowband_core::channel_max(samples).unwrap_or(0),
        min_code: narrowband_core::channel_min(samples).unwrap_or(0),
        dc_level: narrowband_core::channel_mean(samples),
    };
    Ok((table, metrics))
}

/// Like [`compute`], but reports a missing tone as [`QualityReport::NoSignal`].
pub fn assess(samples: &[i32], bits: u32) -> Result<QualityReport> {
    match compute(samples, bits) {
        Ok((harmonics, metrics)) => Ok(QualityReport::Signal { harmonics, metrics }),
        Err(Error::NoCoherentSignal) => {
            tracing::info!(samples = samples.len(), "no AC signal detected");
            Ok(QualityReport::NoSignal)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truncated_cosine(n: usize, omega: f64, amplitude: f64) -> Vec<i32> {
        (0..n)
            .map(|i| (amplitude * (omega * i as f64).cos()) as i32)
            .collect()
    }

    #[test]
    fn full_scale_cosine_reads_zero_dbfs() {
        // 0.12 rad/sample over 65536 points is 1251.66 bins
        let samples = truncated_cosine(65536, 0.12, 8192.0);
        let (table, m) = compute(&samples, 14).unwrap();

        assert_eq!(m.fundamental_bin, 1252);
        assert_eq!(table.fundamental().bin, 1252);
        assert!(m.fundamental_dbfs.abs() < 0.1, "fund {}", m.fundamental_dbfs);
        assert!(m.snr_db > 75.0, "snr {}", m.snr_db);
        assert!(m.thd_db < -75.0, "thd {}", m.thd_db);
        assert!(m.sfdr_db > 75.0, "sfdr {}", m.sfdr_db);
        assert!(m.enob_bits > 12.0, "enob {}", m.enob_bits);
        assert!(m.floor_dbfs < -100.0, "floor {}", m.floor_dbfs);
        assert_eq!(m.max_code, 8192);
        assert_eq!(m.min_code, -8191);
    }

    #[test]
    fn harmonic_levels_in_dbfs() {
        let n = 4096;
        let samples: Vec<i32> = (0..n)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                (4000.0 * (101.0 * phase).cos() + 40.0 * (202.0 * phase).cos()).round() as i32
            })
            .collect();
        let (table, m) = compute(&samples, 14).unwrap();

        assert!((m.fundamental_dbfs - 20.0 * (4000.0f64 / 8192.0).log10()).abs() < 0.01);
        assert!((m.harmonic_dbfs[0] - 20.0 * (40.0f64 / 8192.0).log10()).abs() < 0.1);
        assert_eq!(m.harmonic(2), Some(m.harmonic_dbfs[0]));
        assert_eq!(table.get(2).unwrap().bin, 202);
        assert!((m.thd_db + 40.0).abs() < 0.2);
    }

    #[test]
    fn floor_is_dbc_shifted_to_dbfs() {
        let samples = truncated_cosine(8192, 0.3, 2000.0);
        let fit = sinefit::fit(&samples).unwrap();
        let (_, m) = compute(&samples, 12).unwrap();
        assert!((m.floor_dbfs - (fit.floor_dbc + m.fundamental_dbfs)).abs() < 1e-12);
    }

    #[test]
    fn zero_power_is_negative_infinity() {
        assert_eq!(power_to_dbfs(0.0, 14), f64::NEG_INFINITY);
        assert!((power_to_dbfs(8192.0 * 8192.0, 14)).abs() < 1e-12);
    }

    #[test]
    fn table_indexing() {
        let table = HarmonicTable::default();
        assert!(table.get(0).is_none());
        assert!(table.get(1).is_some());
        assert!(table.get(5).is_some());
        assert!(table.get(6).is_none());
        assert_eq!(table.iter().map(|(h, _)| h).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn silent_capture_reports_no_signal() {
        assert_eq!(assess(&[0; 4096], 14).unwrap(), QualityReport::NoSignal);
        assert!(matches!(compute(&[0; 4096], 14), Err(Error::NoCoherentSignal)));
    }

    #[test]
    fn tone_next_to_dc_reports_no_signal() {
        let n = 4096;
        for bin in [4.0, 5.0] {
            let omega = 2.0 * std::f64::consts::PI * bin / n as f64;
            let samples = truncated_cosine(n, omega, 8000.0);
            assert_eq!(assess(&samples, 14).unwrap(), QualityReport::NoSignal, "bin {bin}");
        }
    }

    #[test]
    fn other_errors_propagate_through_assess() {
        assert!(matches!(assess(&[0; 4096], 0), Err(Error::InvalidBits(0))));
        assert!(matches!(
            assess(&[1, 2, 3], 14),
            Err(Error::CaptureTooShort { .. })
        ));
    }
}

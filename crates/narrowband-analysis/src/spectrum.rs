//! Calibrated dBFS magnitude spectra.

use crate::fft::Fft;
use crate::window::{WindowKind, generate};
use crate::{Error, Result, check_bits, full_scale};
use narrowband_core::{Capture, linspace};

/// Compute the one-sided magnitude spectrum of a capture in dBFS.
///
/// The mean is removed before windowing so the window does not smear DC into
/// neighbouring bins. Bins are scaled by `1/N`, interior bins are doubled to
/// account for the discarded negative frequencies (DC and Nyquist are not),
/// and magnitudes are expressed relative to the full-scale amplitude
/// `2^(bits-1)`. A bin of exactly zero magnitude comes out as `-inf`.
///
/// Returns `N/2 + 1` values for a capture of even length `N`.
pub fn analyze(samples: &[i32], bits: u32, window: WindowKind) -> Result<Vec<f64>> {
    let fft = plan(samples.len(), bits)?;
    Ok(analyze_with(&fft, samples, bits, window))
}

/// Compute dBFS spectra for every channel of a capture.
pub fn analyze_capture(capture: &Capture, bits: u32, window: WindowKind) -> Result<Vec<Vec<f64>>> {
    let fft = plan(capture.num_samples(), bits)?;
    tracing::debug!(
        channels = capture.num_channels(),
        fft_size = fft.size(),
        %window,
        "analyzing capture"
    );
    Ok(capture
        .channels()
        .iter()
        .map(|ch| analyze_with(&fft, ch, bits, window))
        .collect())
}

fn plan(len: usize, bits: u32) -> Result<Fft> {
    check_bits(bits)?;
    if len == 0 {
        return Err(Error::EmptyCapture);
    }
    if len % 2 != 0 {
        return Err(Error::OddLength(len));
    }
    Ok(Fft::new(len))
}

fn analyze_with(fft: &Fft, samples: &[i32], bits: u32, window: WindowKind) -> Vec<f64> {
    let n = samples.len();
    let half = n / 2;
    let mean = narrowband_core::channel_mean(samples);
    let win = generate(n, window);

    let windowed: Vec<f64> = samples
        .iter()
        .zip(win.iter())
        .map(|(&s, &w)| (s as f64 - mean) * w)
        .collect();

    let spectrum = fft.forward(&windowed);
    let scale = 1.0 / n as f64;
    let full_scale = full_scale(bits);

    spectrum
        .iter()
        .enumerate()
        .map(|(k, c)| {
            let mut mag = c.norm() * scale;
            if k > 0 && k < half {
                mag *= 2.0;
            }
            to_dbfs(mag, full_scale)
        })
        .collect()
}

/// `20*log10(magnitude / full_scale)`; zero maps to `-inf`.
pub fn to_dbfs(magnitude: f64, full_scale: f64) -> f64 {
    if magnitude == 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * (magnitude / full_scale).log10()
}

/// Frequency in Hz of each of `num_bins` bins spanning DC to Nyquist.
///
/// This is `linspace(0, sample_rate/2, num_bins)`.
pub fn frequency_axis(num_bins: usize, sample_rate_hz: f64) -> Vec<f64> {
    linspace(0.0, sample_rate_hz / 2.0, num_bins)
}

/// Find the strongest local maxima of a dBFS spectrum.
///
/// Returns up to `count` `(bin, dbfs)` pairs sorted by level, strongest
/// first. The DC bin is never reported; `-inf` bins are skipped.
pub fn find_peaks(spectrum_dbfs: &[f64], count: usize) -> Vec<(usize, f64)> {
    let n = spectrum_dbfs.len();
    let mut peaks: Vec<(usize, f64)> = (1..n)
        .filter(|&i| {
            let v = spectrum_dbfs[i];
            let left = spectrum_dbfs[i - 1];
            let right = if i + 1 < n {
                spectrum_dbfs[i + 1]
            } else {
                f64::NEG_INFINITY
            };
            v.is_finite() && v > left && v >= right
        })
        .map(|i| (i, spectrum_dbfs[i]))
        .collect();

    peaks.sort_by(|a, b| b.1.total_cmp(&a.1));
    peaks.truncate(count);
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn coherent_tone(n: usize, bin: usize, amplitude: f64) -> Vec<i32> {
        (0..n)
            .map(|i| (amplitude * (2.0 * PI * bin as f64 * i as f64 / n as f64).cos()).round() as i32)
            .collect()
    }

    #[test]
    fn output_length_is_half_plus_one() {
        for n in [2, 16, 1024] {
            let out = analyze(&vec![1; n], 14, WindowKind::Hann).unwrap();
            assert_eq!(out.len(), n / 2 + 1);
        }
    }

    #[test]
    fn zero_input_is_all_negative_infinity() {
        let out = analyze(&[0; 512], 14, WindowKind::Hann).unwrap();
        assert!(out.iter().all(|&v| v == f64::NEG_INFINITY));
    }

    #[test]
    fn constant_input_is_all_negative_infinity() {
        // DC removal leaves nothing behind
        let out = analyze(&[-37; 256], 12, WindowKind::FlatTop).unwrap();
        assert!(out.iter().all(|&v| v == f64::NEG_INFINITY));
    }

    #[test]
    fn odd_length_is_rejected() {
        assert!(matches!(
            analyze(&[1, 2, 3], 14, WindowKind::Hann),
            Err(Error::OddLength(3))
        ));
    }

    #[test]
    fn empty_capture_is_rejected() {
        assert!(matches!(
            analyze(&[], 14, WindowKind::Hann),
            Err(Error::EmptyCapture)
        ));
    }

    #[test]
    fn zero_bits_is_rejected() {
        assert!(matches!(
            analyze(&[1, 2], 0, WindowKind::Hann),
            Err(Error::InvalidBits(0))
        ));
    }

    #[test]
    fn full_scale_tone_peak_reads_hann_coherent_gain() {
        // norm = sqrt(8/3) scales Hann to unit power, so the peak bin of a
        // full-scale coherent tone sits at 20*log10(0.5 * norm) = -1.76 dBFS.
        let n = 4096;
        let samples = coherent_tone(n, 100, 8191.0);
        let out = analyze(&samples, 14, WindowKind::Hann).unwrap();

        let (peak_bin, peak_db) = find_peaks(&out, 1)[0];
        assert_eq!(peak_bin, 100);
        assert!((peak_db + 1.76).abs() < 0.05, "peak at {peak_db} dBFS");
    }

    #[test]
    fn half_scale_tone_is_six_db_down() {
        let n = 2048;
        let full = analyze(&coherent_tone(n, 64, 8000.0), 14, WindowKind::Hann).unwrap();
        let half = analyze(&coherent_tone(n, 64, 4000.0), 14, WindowKind::Hann).unwrap();
        let delta = full[64] - half[64];
        assert!((delta - 6.0206).abs() < 0.01, "delta {delta}");
    }

    #[test]
    fn analyze_is_deterministic() {
        let samples = coherent_tone(1024, 33, 3000.0);
        let a = analyze(&samples, 14, WindowKind::BlackmanHarris92).unwrap();
        let b = analyze(&samples, 14, WindowKind::BlackmanHarris92).unwrap();
        assert_eq!(
            a.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            b.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn capture_analysis_per_channel() {
        let capture = Capture::new(vec![
            coherent_tone(512, 20, 4000.0),
            coherent_tone(512, 50, 4000.0),
        ])
        .unwrap();
        let spectra = analyze_capture(&capture, 14, WindowKind::Hann).unwrap();
        assert_eq!(spectra.len(), 2);
        assert_eq!(find_peaks(&spectra[0], 1)[0].0, 20);
        assert_eq!(find_peaks(&spectra[1], 1)[0].0, 50);
    }

    #[test]
    fn frequency_axis_ends_at_nyquist() {
        let axis = frequency_axis(513, 125e6);
        assert_eq!(axis.len(), 513);
        assert_eq!(axis[0], 0.0);
        assert_eq!(axis[512], 62.5e6);
        assert!((axis[1] - 125e6 / 1024.0).abs() < 1e-6);
    }

    #[test]
    fn peaks_sorted_and_truncated() {
        let spectrum = [0.0, -50.0, -10.0, -50.0, -20.0, -60.0, -5.0, -70.0];
        let peaks = find_peaks(&spectrum, 2);
        assert_eq!(peaks, vec![(6, -5.0), (2, -10.0)]);
    }
}

//! FFT wrapper over `rustfft`.

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// Forward FFT processor for a fixed size.
///
/// Planning is done once in [`Fft::new`]; the same plan can then be reused
/// for every channel of a capture.
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    /// Get FFT size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward FFT of real input, returning all `size` bins.
    ///
    /// Input shorter than the FFT size is zero-padded; longer input is
    /// truncated.
    pub fn forward_full(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);
        buffer
    }

    /// Forward FFT of real input, returning bins `0..=size/2` (DC to Nyquist).
    pub fn forward(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer = self.forward_full(input);
        buffer.truncate(self.size / 2 + 1);
        buffer
    }
}

/// Magnitude of each bin.
pub fn magnitude(spectrum: &[Complex<f64>]) -> Vec<f64> {
    spectrum.iter().map(|c| c.norm()).collect()
}

/// Squared magnitude of each bin.
pub fn power(spectrum: &[Complex<f64>]) -> Vec<f64> {
    spectrum.iter().map(|c| c.norm_sqr()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_positive_bins_only() {
        let fft = Fft::new(256);
        let spectrum = fft.forward(&vec![0.0; 256]);
        assert_eq!(spectrum.len(), 129);
        assert!(spectrum.iter().all(|c| c.norm() == 0.0));
    }

    #[test]
    fn test_bin_centered_tone() {
        let fft = Fft::new(256);
        let input: Vec<f64> = (0..256)
            .map(|i| (2.0 * PI * 10.0 * i as f64 / 256.0).cos())
            .collect();
        let mags = magnitude(&fft.forward(&input));

        // Unnormalized: a unit cosine puts N/2 into its bin
        assert!((mags[10] - 128.0).abs() < 1e-9);
        for (i, &m) in mags.iter().enumerate() {
            if i != 10 {
                assert!(m < 1e-9, "leakage at bin {i}: {m}");
            }
        }
    }

    #[test]
    fn test_dc_detection() {
        let fft = Fft::new(64);
        let spectrum = fft.forward(&[1.0; 64]);
        assert!((spectrum[0].re - 64.0).abs() < 1e-9);
        let other: f64 = power(&spectrum[1..]).iter().sum();
        assert!(other < 1e-18);
    }

    #[test]
    fn test_zero_padding() {
        let fft = Fft::new(8);
        let full = fft.forward_full(&[1.0, 1.0]);
        assert_eq!(full.len(), 8);
        assert!((full[0].re - 2.0).abs() < 1e-12);
    }
}

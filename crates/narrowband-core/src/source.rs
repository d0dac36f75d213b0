//! Capture sources.
//!
//! The receiver board is an external collaborator: whatever triggers it and
//! drains its FIFO only has to hand back one [`Capture`] per call. Callers own
//! the source explicitly, so opening and closing hardware follows the
//! source's own lifetime instead of process-wide state.

use crate::{AdcConfig, Capture, Result};
use std::f64::consts::PI;

/// Anything that can deliver a multi-channel integer capture.
pub trait CaptureSource {
    /// ADC description used to interpret the returned codes.
    fn config(&self) -> &AdcConfig;

    /// Trigger and return `num_samples` samples on every channel.
    fn capture(&mut self, num_samples: usize) -> Result<Capture>;
}

/// A single cosine component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in radians per sample (π is Nyquist).
    pub omega: f64,
    /// Peak amplitude in codes.
    pub amplitude: f64,
}

impl Tone {
    /// Tone at `omega` radians per sample.
    pub fn radians(omega: f64, amplitude: f64) -> Self {
        Self { omega, amplitude }
    }

    /// Tone completing `cycles` periods over a record of `num_samples`.
    ///
    /// An integer `cycles` gives a coherently sampled tone that lands exactly
    /// on FFT bin `cycles`.
    pub fn cycles(cycles: f64, num_samples: usize, amplitude: f64) -> Self {
        Self {
            omega: 2.0 * PI * cycles / num_samples as f64,
            amplitude,
        }
    }

    fn sample(&self, n: usize) -> f64 {
        self.amplitude * (self.omega * n as f64).cos()
    }
}

/// Deterministic synthetic source: one cosine per channel plus optional noise.
///
/// Channel `i` uses tone `i % tones.len()`; with no tones every channel is
/// silent apart from noise. Values are truncated toward zero and clamped into
/// the ADC code range.
#[derive(Debug, Clone)]
pub struct ToneSource {
    config: AdcConfig,
    tones: Vec<Tone>,
    harmonics: Vec<(usize, f64)>,
    noise_rms: f64,
    rng_state: u32,
}

impl ToneSource {
    /// Create a silent source for the given ADC.
    pub fn new(config: AdcConfig) -> Self {
        Self {
            config,
            tones: Vec::new(),
            harmonics: Vec::new(),
            noise_rms: 0.0,
            rng_state: 0x12345678,
        }
    }

    /// Add a tone (assigned to the next channel).
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tones.push(tone);
        self
    }

    /// Add a harmonic of every channel's tone at `amplitude` codes.
    pub fn with_harmonic(mut self, order: usize, amplitude: f64) -> Self {
        self.harmonics.push((order, amplitude));
        self
    }

    /// Add approximately Gaussian noise with the given RMS in codes.
    pub fn with_noise(mut self, rms: f64) -> Self {
        self.noise_rms = rms;
        self
    }

    /// Reseed the noise generator.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng_state = seed.max(1);
        self
    }

    fn next_uniform(&mut self) -> f64 {
        // xorshift32
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x as f64 / u32::MAX as f64
    }

    fn next_gaussian(&mut self) -> f64 {
        // Irwin-Hall: sum of 12 uniforms has unit variance around 6
        (0..12).map(|_| self.next_uniform()).sum::<f64>() - 6.0
    }
}

impl CaptureSource for ToneSource {
    fn config(&self) -> &AdcConfig {
        &self.config
    }

    fn capture(&mut self, num_samples: usize) -> Result<Capture> {
        self.config.validate()?;
        let mut channels = Vec::with_capacity(self.config.num_channels);
        for ch in 0..self.config.num_channels {
            let tone = if self.tones.is_empty() {
                None
            } else {
                Some(self.tones[ch % self.tones.len()])
            };
            let mut samples = Vec::with_capacity(num_samples);
            for n in 0..num_samples {
                let mut value = 0.0;
                if let Some(tone) = tone {
                    value += tone.sample(n);
                    for &(order, amplitude) in &self.harmonics {
                        let harmonic = Tone {
                            omega: tone.omega * order as f64,
                            amplitude,
                        };
                        value += harmonic.sample(n);
                    }
                }
                if self.noise_rms > 0.0 {
                    value += self.noise_rms * self.next_gaussian();
                }
                samples.push(self.config.clamp_code(value as i64));
            }
            channels.push(samples);
        }
        tracing::debug!(
            channels = channels.len(),
            num_samples,
            "synthetic capture generated"
        );
        Capture::new(channels)
    }
}

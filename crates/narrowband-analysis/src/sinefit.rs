//! Single-tone decomposition of an ADC capture.
//!
//! The capture is windowed with the 92 dB Blackman-Harris window and split
//! into DC, a fundamental, harmonics 2..=5 and a noise remainder:
//!
//! 1. Power per bin is scaled so that the main lobe of a cosine with peak
//!    amplitude `A` sums to `A²`.
//! 2. The strongest bin above the DC region is the fundamental. Its lobe
//!    (`bin ± LOBE`) is claimed, and a power-weighted centroid gives a
//!    fractional frequency estimate. A fundamental whose main lobe reaches
//!    into the DC region cannot be separated from DC and is not fitted.
//! 3. Each harmonic is located at `h·f1` folded back into `[0, N/2]`, refined
//!    to the strongest unclaimed bin within `± SEARCH`, and its lobe claimed.
//!    A harmonic that lands entirely on already-claimed bins has zero power.
//! 4. Every unclaimed bin is noise. The mean noise per bin is extrapolated
//!    over the whole non-DC band.
//!
//! Results are estimates: expect agreement with other analyzers within a
//! fraction of a dB, not bit-exact equality.

use crate::fft::{Fft, power};
use crate::window::{WindowKind, generate};
use crate::{Error, Result};

/// Half-width in bins of the main lobe claimed for each component.
pub const LOBE: usize = 5;

/// Half-width in bins of the Blackman-Harris-92 main lobe.
pub const MAIN_LOBE: usize = 4;

/// Search radius in bins when refining a harmonic's location.
pub const SEARCH: usize = 2;

/// Number of components reported, fundamental included.
pub const NUM_HARMONICS: usize = 5;

/// Shortest capture accepted.
pub const MIN_SAMPLES: usize = 256;

/// A spectral component: power and bin location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Component {
    /// Power in squared codes; `sqrt(power)` is the peak amplitude.
    pub power: f64,
    /// Bin index of the component's peak.
    pub bin: usize,
}

/// Decomposition of a capture into fundamental, harmonics and noise.
#[derive(Debug, Clone, PartialEq)]
pub struct SineFit {
    /// Components 1..=5; index 0 is the fundamental.
    pub harmonics: [Component; NUM_HARMONICS],
    /// Fractional fundamental frequency in bins.
    pub fundamental_bin_estimate: f64,
    /// Power remaining in the DC region after mean removal.
    pub dc_power: f64,
    /// Total noise power over the non-DC band.
    pub noise_power: f64,
    /// Mean noise power per bin.
    pub noise_per_bin: f64,
    /// Largest component that is neither DC, fundamental nor a harmonic.
    pub spur: Component,
    /// Signal-to-noise ratio in dB.
    pub snr_db: f64,
    /// Total harmonic distortion (harmonics 2..=5) in dBc.
    pub thd_db: f64,
    /// Signal to noise-and-distortion ratio in dB.
    pub sinad_db: f64,
    /// Effective number of bits from SINAD.
    pub enob_bits: f64,
    /// Spurious-free dynamic range in dB.
    pub sfdr_db: f64,
    /// Noise floor per bin in dBc.
    pub floor_dbc: f64,
}

impl SineFit {
    /// The fundamental component.
    pub fn fundamental(&self) -> Component {
        self.harmonics[0]
    }
}

/// Decompose a capture.
///
/// Fails with [`Error::NoCoherentSignal`] when the capture has no AC content,
/// when the strongest tone sits within a main lobe of DC, or when noise and
/// distortion outweigh the strongest tone.
pub fn fit(samples: &[i32]) -> Result<SineFit> {
    let n = samples.len();
    if n < MIN_SAMPLES {
        return Err(Error::CaptureTooShort {
            len: n,
            min: MIN_SAMPLES,
        });
    }
    let half = n / 2;

    let bins = power_spectrum(samples);
    let mut claimed = vec![false; bins.len()];

    let dc_power = claim(&bins, &mut claimed, 0);

    let band = LOBE + 1..=half;
    let ac_power: f64 = bins[band.clone()].iter().sum();
    if ac_power.is_nan() || ac_power <= 0.0 {
        return Err(Error::NoCoherentSignal);
    }

    let fund_bin = band
        .clone()
        .max_by(|&a, &b| bins[a].total_cmp(&bins[b]))
        .ok_or(Error::NoCoherentSignal)?;
    if fund_bin < LOBE + MAIN_LOBE {
        tracing::debug!(fund_bin, "strongest tone overlaps the DC region");
        return Err(Error::NoCoherentSignal);
    }
    let fund_estimate = centroid(&bins, fund_bin);
    let fundamental = Component {
        power: claim(&bins, &mut claimed, fund_bin),
        bin: fund_bin,
    };

    let mut harmonics = [Component::default(); NUM_HARMONICS];
    harmonics[0] = fundamental;
    for (h, slot) in harmonics.iter_mut().enumerate().skip(1) {
        let expected = alias_bin((h + 1) as f64 * fund_estimate, n);
        let bin = refine(&bins, &claimed, expected);
        *slot = Component {
            power: claim(&bins, &mut claimed, bin),
            bin,
        };
    }

    let (noise_sum, noise_bins) = bins
        .iter()
        .zip(&claimed)
        .filter(|&(_, &c)| !c)
        .fold((0.0, 0usize), |(sum, count), (&p, _)| (sum + p, count + 1));
    if noise_bins == 0 {
        return Err(Error::NoCoherentSignal);
    }
    let noise_per_bin = noise_sum / noise_bins as f64;
    let noise_power = noise_per_bin * (half - LOBE) as f64;

    let spur = largest_spur(&bins, &claimed);

    let fund = fundamental.power;
    let distortion: f64 = harmonics[1..].iter().map(|c| c.power).sum();
    let residual = noise_power + distortion;
    if fund.is_nan() || fund <= residual {
        tracing::debug!(
            fund,
            noise_power,
            distortion,
            "residual energy dominates, no tone fitted"
        );
        return Err(Error::NoCoherentSignal);
    }

    let max_spur = harmonics[1..]
        .iter()
        .map(|c| c.power)
        .fold(spur.power, f64::max);

    let sinad_db = ratio_db(fund, noise_power + distortion);
    let fit = SineFit {
        harmonics,
        fundamental_bin_estimate: fund_estimate,
        dc_power,
        noise_power,
        noise_per_bin,
        spur,
        snr_db: ratio_db(fund, noise_power),
        thd_db: ratio_db(distortion, fund),
        sinad_db,
        enob_bits: (sinad_db - 1.76) / 6.02,
        sfdr_db: ratio_db(fund, max_spur),
        floor_dbc: ratio_db(noise_per_bin, fund),
    };

    tracing::debug!(
        n,
        fundamental_bin = fund_bin,
        snr_db = fit.snr_db,
        thd_db = fit.thd_db,
        "sine fit"
    );
    Ok(fit)
}

/// One-sided power spectrum scaled to squared peak amplitude.
fn power_spectrum(samples: &[i32]) -> Vec<f64> {
    let n = samples.len();
    let mean = narrowband_core::channel_mean(samples);
    let window = generate(n, WindowKind::BlackmanHarris92);
    let sum_w2: f64 = window.iter().map(|w| w * w).sum();

    let windowed: Vec<f64> = samples
        .iter()
        .zip(&window)
        .map(|(&s, &w)| (s as f64 - mean) * w)
        .collect();

    let mut bins = power(&Fft::new(n).forward(&windowed));
    let interior = 4.0 / (n as f64 * sum_w2);
    let edge = 2.0 / (n as f64 * sum_w2);
    let last = bins.len() - 1;
    for (k, p) in bins.iter_mut().enumerate() {
        let is_nyquist = k == last && n % 2 == 0;
        *p *= if k == 0 || is_nyquist { edge } else { interior };
    }
    bins
}

/// Sum and claim the unclaimed bins within `center ± LOBE`.
fn claim(bins: &[f64], claimed: &mut [bool], center: usize) -> f64 {
    let lo = center.saturating_sub(LOBE);
    let hi = (center + LOBE).min(bins.len() - 1);
    let mut total = 0.0;
    for k in lo..=hi {
        if !claimed[k] {
            total += bins[k];
            claimed[k] = true;
        }
    }
    total
}

/// Power-weighted centre of the lobe around `center`, in fractional bins.
fn centroid(bins: &[f64], center: usize) -> f64 {
    let lo = center.saturating_sub(LOBE);
    let hi = (center + LOBE).min(bins.len() - 1);
    let (weighted, total) = (lo..=hi).fold((0.0, 0.0), |(w, t), k| {
        (w + k as f64 * bins[k], t + bins[k])
    });
    if total > 0.0 {
        weighted / total
    } else {
        center as f64
    }
}

/// Strongest unclaimed bin within `expected ± SEARCH`, or `expected` itself.
fn refine(bins: &[f64], claimed: &[bool], expected: usize) -> usize {
    let lo = expected.saturating_sub(SEARCH);
    let hi = (expected + SEARCH).min(bins.len() - 1);
    (lo..=hi)
        .filter(|&k| !claimed[k])
        .max_by(|&a, &b| bins[a].total_cmp(&bins[b]))
        .unwrap_or(expected.min(bins.len() - 1))
}

/// Largest unclaimed peak outside the DC region, with its lobe power.
fn largest_spur(bins: &[f64], claimed: &[bool]) -> Component {
    let Some(bin) = (LOBE + 1..bins.len())
        .filter(|&k| !claimed[k])
        .max_by(|&a, &b| bins[a].total_cmp(&bins[b]))
    else {
        return Component::default();
    };
    let lo = bin.saturating_sub(LOBE);
    let hi = (bin + LOBE).min(bins.len() - 1);
    let power = (lo..=hi).filter(|&k| !claimed[k]).map(|k| bins[k]).sum();
    Component { power, bin }
}

/// Fold a frequency in bins into the first Nyquist zone `[0, N/2]`.
pub fn alias_bin(frequency_bins: f64, n: usize) -> usize {
    let n_f = n as f64;
    let mut f = frequency_bins.rem_euclid(n_f);
    if f > n_f / 2.0 {
        f = n_f - f;
    }
    (f.round() as usize).min(n / 2)
}

/// `10*log10(num/den)`, with `+inf` for a zero denominator.
fn ratio_db(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return f64::INFINITY;
    }
    if num == 0.0 {
        return f64::NEG_INFINITY;
    }
    10.0 * (num / den).log10()
}

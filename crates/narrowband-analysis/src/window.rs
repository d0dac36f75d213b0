//! Cosine-sum windows matching PScope's window set.
//!
//! Every window is a sum of up to four cosine terms evaluated on the phase
//! ramp `t = i / (n - 1)`, then multiplied by a normalization constant:
//!
//! ```text
//! w(t) = norm * (a0 - a1 cos(2πt) + a2 cos(4πt) - a3 cos(6πt))
//! ```

use crate::Error;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowKind {
    /// Hann window (raised cosine)
    #[default]
    Hann,
    /// Hamming window
    Hamming,
    /// Classic Blackman window
    Blackman,
    /// Exact Blackman window (first sidelobes nulled)
    BlackmanExact,
    /// Three-term Blackman-Harris, ~70 dB sidelobes
    BlackmanHarris70,
    /// Flat-top window for amplitude accuracy
    FlatTop,
    /// Four-term Blackman-Harris, ~92 dB sidelobes
    BlackmanHarris92,
}

impl WindowKind {
    /// Every supported window, in table order.
    pub const ALL: [WindowKind; 7] = [
        WindowKind::Hann,
        WindowKind::Hamming,
        WindowKind::Blackman,
        WindowKind::BlackmanExact,
        WindowKind::BlackmanHarris70,
        WindowKind::FlatTop,
        WindowKind::BlackmanHarris92,
    ];

    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Hann => "Hann",
            WindowKind::Hamming => "Hamming",
            WindowKind::Blackman => "Blackman",
            WindowKind::BlackmanExact => "BlackmanExact",
            WindowKind::BlackmanHarris70 => "BlackmanHarris70",
            WindowKind::FlatTop => "FlatTop",
            WindowKind::BlackmanHarris92 => "BlackmanHarris92",
        }
    }

    /// Cosine coefficients `[a0, a1, a2, a3]`; unused terms are zero.
    pub fn coefficients(&self) -> [f64; 4] {
        match self {
            WindowKind::Hann => [0.50, 0.50, 0.0, 0.0],
            WindowKind::Hamming => [0.54, 0.46, 0.0, 0.0],
            WindowKind::Blackman => [0.42, 0.50, 0.08, 0.0],
            WindowKind::BlackmanExact => [0.42659071, 0.49656062, 0.07684867, 0.0],
            WindowKind::BlackmanHarris70 => [0.42323, 0.49755, 0.07922, 0.0],
            WindowKind::FlatTop => [0.2810639, 0.5208972, 0.1980399, 0.0],
            WindowKind::BlackmanHarris92 => [0.35875, 0.48829, 0.14128, 0.01168],
        }
    }

    /// Normalization constant applied after the cosine sum.
    pub fn norm(&self) -> f64 {
        match self {
            WindowKind::Hann => 1.632993,
            WindowKind::Hamming => 1.586303,
            WindowKind::Blackman => 1.811903,
            WindowKind::BlackmanExact => 1.801235,
            WindowKind::BlackmanHarris70 => 1.807637,
            WindowKind::FlatTop => 2.066037,
            WindowKind::BlackmanHarris92 => 1.968888,
        }
    }

    /// Number of cosine harmonics in the sum (1, 2 or 3).
    pub fn terms(&self) -> usize {
        match self {
            WindowKind::Hann | WindowKind::Hamming => 1,
            WindowKind::BlackmanHarris92 => 3,
            _ => 2,
        }
    }

    /// Window value at phase `t` in `[0, 1]`.
    pub fn value_at(&self, t: f64) -> f64 {
        let [a0, a1, a2, a3] = self.coefficients();
        let x = 2.0 * PI * t;
        let mut w = a0 - a1 * x.cos();
        if self.terms() >= 2 {
            w += a2 * (2.0 * x).cos();
        }
        if self.terms() >= 3 {
            w -= a3 * (3.0 * x).cos();
        }
        w * self.norm()
    }

    /// Multiply a buffer by this window in place.
    pub fn apply(&self, buffer: &mut [f64]) {
        let coeffs = generate(buffer.len(), *self);
        for (sample, w) in buffer.iter_mut().zip(coeffs) {
            *sample *= w;
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidWindowKind(s.to_string()))
    }
}

/// Comma-separated list of window names, for messages.
pub fn names() -> String {
    WindowKind::ALL
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generate `length` window coefficients.
///
/// A single-point window is evaluated at `t = 0`.
pub fn generate(length: usize, kind: WindowKind) -> Vec<f64> {
    match length {
        0 => Vec::new(),
        1 => vec![kind.value_at(0.0)],
        _ => {
            let span = (length - 1) as f64;
            (0..length).map(|i| kind.value_at(i as f64 / span)).collect()
        }
    }
}

//! Multi-channel integer captures.

use crate::{Error, Result};

/// One trigger's worth of ADC codes, one sequence per channel.
///
/// All channels share the same length; [`Capture::new`] enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Capture {
    channels: Vec<Vec<i32>>,
}

impl Capture {
    /// Build a capture from per-channel sequences.
    pub fn new(channels: Vec<Vec<i32>>) -> Result<Self> {
        if let Some(first) = channels.first() {
            let expected = first.len();
            if let Some((channel, found)) = channels
                .iter()
                .enumerate()
                .find(|(_, ch)| ch.len() != expected)
                .map(|(i, ch)| (i, ch.len()))
            {
                return Err(Error::LengthMismatch {
                    channel,
                    expected,
                    found,
                });
            }
        }
        Ok(Self { channels })
    }

    /// Build a capture from row-major data (one row per sample instant).
    pub fn from_rows(rows: &[Vec<i32>]) -> Result<Self> {
        let num_channels = rows.first().map_or(0, Vec::len);
        let mut channels = vec![Vec::with_capacity(rows.len()); num_channels];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != num_channels {
                return Err(Error::RaggedRow {
                    row: i,
                    expected: num_channels,
                    found: row.len(),
                });
            }
            for (ch, &v) in channels.iter_mut().zip(row) {
                ch.push(v);
            }
        }
        Ok(Self { channels })
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel (0 for an empty capture).
    pub fn num_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// True when there are no channels or no samples.
    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    /// Samples of one channel.
    pub fn channel(&self, index: usize) -> Option<&[i32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// All channels in order.
    pub fn channels(&self) -> &[Vec<i32>] {
        &self.channels
    }

    /// Row `index` across all channels.
    pub fn row(&self, index: usize) -> Option<Vec<i32>> {
        if index >= self.num_samples() {
            return None;
        }
        Some(self.channels.iter().map(|ch| ch[index]).collect())
    }
}

/// Smallest code in a channel.
pub fn channel_min(samples: &[i32]) -> Option<i32> {
    samples.iter().copied().min()
}

/// Largest code in a channel.
pub fn channel_max(samples: &[i32]) -> Option<i32> {
    samples.iter().copied().max()
}

/// Arithmetic mean of a channel (0 for an empty slice).
pub fn channel_mean(samples: &[i32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64
}

/// `num` evenly spaced values from `start` to `stop` inclusive.
///
/// The last value is exactly `stop`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_lengths() {
        let err = Capture::new(vec![vec![1, 2, 3], vec![1, 2]]).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                channel: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn empty_capture_is_allowed() {
        let capture = Capture::new(vec![]).unwrap();
        assert_eq!(capture.num_channels(), 0);
        assert_eq!(capture.num_samples(), 0);
        assert!(capture.is_empty());
    }

    #[test]
    fn from_rows_transposes() {
        let capture = Capture::from_rows(&[vec![1, 10], vec![2, 20], vec![3, 30]]).unwrap();
        assert_eq!(capture.num_channels(), 2);
        assert_eq!(capture.channel(0), Some(&[1, 2, 3][..]));
        assert_eq!(capture.channel(1), Some(&[10, 20, 30][..]));
        assert_eq!(capture.row(1), Some(vec![2, 20]));
        assert_eq!(capture.row(3), None);
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        assert!(Capture::from_rows(&[vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn channel_statistics() {
        let samples = [-4, 0, 6, 2];
        assert_eq!(channel_min(&samples), Some(-4));
        assert_eq!(channel_max(&samples), Some(6));
        assert_eq!(channel_mean(&samples), 1.0);
        assert_eq!(channel_mean(&[]), 0.0);
    }

    #[test]
    fn linspace_endpoints() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        let axis = linspace(0.0, 0.1, 11);
        assert_eq!(axis.len(), 11);
        assert_eq!(axis[0], 0.0);
        assert_eq!(axis[10], 0.1);
    }
}

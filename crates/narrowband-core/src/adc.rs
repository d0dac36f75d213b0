//! ADC description.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Description of the receiver ADC that produced a capture.
///
/// The defaults describe the LTM9004 receiver on a DC1513B-AA demo board:
/// 14-bit, bipolar, 125 Msps, two channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdcConfig {
    /// Resolution in bits.
    pub bits: u32,
    /// True when codes are signed (two's complement around zero).
    pub bipolar: bool,
    /// Sample rate in MHz.
    pub sample_rate_mhz: f64,
    /// Number of channels delivered per trigger.
    pub num_channels: usize,
    /// Demo board identifier written to the `DemoID` header line.
    pub demo_board: String,
    /// Device identifier written to the `DemoID` header line.
    pub device: String,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            bits: 14,
            bipolar: true,
            sample_rate_mhz: 125.0,
            num_channels: 2,
            demo_board: "DC_1513B-AA".to_string(),
            device: "LTM9004".to_string(),
        }
    }
}

impl AdcConfig {
    /// Check the bit depth, sample rate and board identifiers.
    ///
    /// Identifiers end up as comma-separated header fields, so they may not
    /// contain commas or line breaks.
    pub fn validate(&self) -> Result<()> {
        if !(1..=31).contains(&self.bits) {
            return Err(Error::InvalidBits(self.bits));
        }
        if !self.sample_rate_mhz.is_finite() || self.sample_rate_mhz <= 0.0 {
            return Err(Error::InvalidSampleRate(self.sample_rate_mhz));
        }
        for (field, value) in [("demo_board", &self.demo_board), ("device", &self.device)] {
            if value.contains([',', '\n', '\r']) {
                return Err(Error::InvalidIdentifier {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Lowest representable code.
    pub fn min_code(&self) -> i64 {
        if self.bipolar {
            -(1i64 << (self.bits - 1))
        } else {
            0
        }
    }

    /// Exclusive upper bound of the code range.
    ///
    /// PScope records this bound (not the largest code) as `maxCode`.
    pub fn max_code(&self) -> i64 {
        if self.bipolar {
            1i64 << (self.bits - 1)
        } else {
            1i64 << self.bits
        }
    }

    /// Peak amplitude of a full-scale sine, `2^(bits-1)`.
    pub fn full_scale_amplitude(&self) -> f64 {
        2f64.powi(self.bits as i32 - 1)
    }

    /// Sample rate in Hz.
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_mhz * 1e6
    }

    /// Clamp a code into the representable range.
    pub fn clamp_code(&self, code: i64) -> i32 {
        code.clamp(self.min_code(), self.max_code() - 1) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bipolar_code_range() {
        let adc = AdcConfig::default();
        assert_eq!(adc.min_code(), -8192);
        assert_eq!(adc.max_code(), 8192);
        assert_eq!(adc.full_scale_amplitude(), 8192.0);
    }

    #[test]
    fn unipolar_code_range() {
        let adc = AdcConfig {
            bits: 12,
            bipolar: false,
            ..Default::default()
        };
        assert_eq!(adc.min_code(), 0);
        assert_eq!(adc.max_code(), 4096);
        assert_eq!(adc.clamp_code(5000), 4095);
        assert_eq!(adc.clamp_code(-3), 0);
    }

    #[test]
    fn validate_rejects_zero_bits() {
        let adc = AdcConfig {
            bits: 0,
            ..Default::default()
        };
        assert!(matches!(adc.validate(), Err(Error::InvalidBits(0))));
    }

    #[test]
    fn validate_rejects_non_positive_rate() {
        let adc = AdcConfig {
            sample_rate_mhz: 0.0,
            ..Default::default()
        };
        assert!(matches!(adc.validate(), Err(Error::InvalidSampleRate(_))));
    }

    #[test]
    fn validate_rejects_commas_in_identifiers() {
        let adc = AdcConfig {
            demo_board: "DC,1513".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            adc.validate(),
            Err(Error::InvalidIdentifier {
                field: "demo_board",
                ..
            })
        ));

        let adc = AdcConfig {
            device: "LTM\n9004".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            adc.validate(),
            Err(Error::InvalidIdentifier { field: "device", .. })
        ));
    }

    #[test]
    fn one_bit_adc() {
        let adc = AdcConfig {
            bits: 1,
            ..Default::default()
        };
        assert!(adc.validate().is_ok());
        assert_eq!(adc.min_code(), -1);
        assert_eq!(adc.max_code(), 1);
        assert_eq!(adc.full_scale_amplitude(), 1.0);
    }
}

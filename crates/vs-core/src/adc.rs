//! 12-bit analog-to-digital reading range.
//!
//! Every value that leaves the generator passes through [`clamp_adc`], so the
//! published payload is always a valid reading for the downstream consumer.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Lowest valid reading.
pub const ADC_MIN: i64 = 0;
/// Highest valid reading (2^12 - 1).
pub const ADC_MAX: i64 = 4095;

/// Constrain a raw value into `[ADC_MIN, ADC_MAX]`.
pub fn clamp_adc(raw: i64) -> i64 {
    raw.clamp(ADC_MIN, ADC_MAX)
}

/// A reading that has already been clamped into the ADC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdcSample(u16);

impl AdcSample {
    /// Clamp a raw signal value and wrap it.
    pub fn from_raw(raw: i64) -> Self {
        // clamp_adc guarantees 0..=4095, which always fits in u16
        Self(clamp_adc(raw) as u16)
    }

    /// Get the reading.
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Zero-padded four digit form used on the console.
    pub fn padded(&self) -> String {
        format!("{:04}", self.0)
    }
}

/// Plain decimal form, which is also the wire payload.
impl fmt::Display for AdcSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AdcSample> for i64 {
    fn from(sample: AdcSample) -> Self {
        sample.0 as i64
    }
}

pub fn ensure_range(value: f64, lo: f64, hi: f64, what: &'static str) -> CoreResult<f64> {
    if !value.is_finite() {
        return Err(CoreError::InvalidArg { what });
    }
    if value < lo || value > hi {
        return Err(CoreError::OutOfRange { what, value, lo, hi });
    }
    Ok(value)
}

//! Waveform parameters.
//!
//! Defaults reproduce the reference sensor profile: a sine wave centered on
//! mid-scale (2048) with an 800 count swing, faults outside 200..3800, and an
//! idle baseline of 512.

use serde::{Deserialize, Serialize};
use vs_core::ensure_range;

use crate::error::{SignalError, SignalResult};

/// Largest magnitude accepted for any level, band edge, amplitude or noise
/// width. Sixteen times the ADC span leaves room for deliberately
/// out-of-range test signals while keeping every sum far from `i64` limits.
pub const PARAM_LIMIT: i64 = 65_536;

/// Parameters for the normal (sine) regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalParams {
    /// Sine center, in ADC counts.
    pub center: i64,
    /// Sine amplitude, in ADC counts.
    pub amplitude: f64,
    /// Phase advance per step (radians).
    pub phase_increment: f64,
    /// Half-width of the uniform integer noise band.
    pub noise: i64,
}

impl Default for NormalParams {
    fn default() -> Self {
        Self {
            center: 2048,
            amplitude: 800.0,
            phase_increment: 0.5,
            noise: 50,
        }
    }
}

/// Parameters for the fault regime.
///
/// Each sample is drawn uniformly from the high band with probability
/// `high_probability`, otherwise uniformly from the low band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyParams {
    pub high_min: i64,
    pub high_max: i64,
    pub low_min: i64,
    pub low_max: i64,
    pub high_probability: f64,
}

impl Default for AnomalyParams {
    fn default() -> Self {
        Self {
            high_min: 3800,
            high_max: 4095,
            low_min: 0,
            low_max: 200,
            high_probability: 0.5,
        }
    }
}

/// Parameters for the idle regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleParams {
    pub baseline: i64,
    pub noise: i64,
}

impl Default for IdleParams {
    fn default() -> Self {
        Self {
            baseline: 512,
            noise: 30,
        }
    }
}

/// All waveform parameters, one block per mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformParams {
    pub normal: NormalParams,
    pub anomaly: AnomalyParams,
    pub idle: IdleParams,
}

impl WaveformParams {
    /// Check every block; the first problem found is reported.
    pub fn validate(&self) -> SignalResult<()> {
        let limit = PARAM_LIMIT as f64;

        let n = &self.normal;
        ensure_range(n.center as f64, -limit, limit, "normal.center")?;
        ensure_range(n.amplitude, 0.0, limit, "normal.amplitude")?;
        if !n.phase_increment.is_finite() {
            return Err(invalid("normal.phase_increment must be finite"));
        }
        if n.noise < 0 {
            return Err(invalid("normal.noise must be non-negative"));
        }
        ensure_range(n.noise as f64, 0.0, limit, "normal.noise")?;

        let a = &self.anomaly;
        for (value, what) in [
            (a.high_min, "anomaly.high_min"),
            (a.high_max, "anomaly.high_max"),
            (a.low_min, "anomaly.low_min"),
            (a.low_max, "anomaly.low_max"),
        ] {
            ensure_range(value as f64, -limit, limit, what)?;
        }
        if a.high_min > a.high_max {
            return Err(invalid("anomaly.high_min must not exceed anomaly.high_max"));
        }
        if a.low_min > a.low_max {
            return Err(invalid("anomaly.low_min must not exceed anomaly.low_max"));
        }
        ensure_range(a.high_probability, 0.0, 1.0, "anomaly.high_probability")?;

        if self.idle.noise < 0 {
            return Err(invalid("idle.noise must be non-negative"));
        }
        ensure_range(self.idle.noise as f64, 0.0, limit, "idle.noise")?;
        ensure_range(self.idle.baseline as f64, -limit, limit, "idle.baseline")?;
        Ok(())
    }
}

fn invalid(what: &str) -> SignalError {
    SignalError::InvalidParam {
        what: what.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        WaveformParams::default().validate().unwrap();
    }

    #[test]
    fn rejects_inverted_bands() {
        let mut p = WaveformParams::default();
        p.anomaly.low_min = 300;
        assert!(p.validate().is_err());

        let mut p = WaveformParams::default();
        p.anomaly.high_max = 100;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_bad_probability() {
        let mut p = WaveformParams::default();
        p.anomaly.high_probability = 1.5;
        assert!(matches!(p.validate(), Err(SignalError::Core(_))));
    }

    #[test]
    fn rejects_negative_noise() {
        let mut p = WaveformParams::default();
        p.idle.noise = -1;
        assert!(p.validate().is_err());

        let mut p = WaveformParams::default();
        p.normal.amplitude = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_levels_beyond_limit() {
        let mut p = WaveformParams::default();
        p.idle.baseline = i64::MAX;
        assert!(matches!(p.validate(), Err(SignalError::Core(_))));

        let mut p = WaveformParams::default();
        p.normal.center = i64::MIN;
        assert!(p.validate().is_err());

        let mut p = WaveformParams::default();
        p.idle.noise = PARAM_LIMIT + 1;
        assert!(p.validate().is_err());

        let mut p = WaveformParams::default();
        p.normal.amplitude = 1e300;
        assert!(p.validate().is_err());

        let mut p = WaveformParams::default();
        p.anomaly.high_max = i64::MAX;
        assert!(p.validate().is_err());
    }

    #[test]
    fn accepts_out_of_range_levels_within_limit() {
        let mut p = WaveformParams::default();
        p.idle.baseline = -100;
        p.normal.center = 5000;
        p.validate().unwrap();
    }
}

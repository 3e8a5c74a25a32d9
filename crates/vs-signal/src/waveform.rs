//! The three signal functions.
//!
//! All functions return the raw value before clamping.

use rand::Rng;

use crate::params::{AnomalyParams, IdleParams, NormalParams};

/// Noisy sine wave: `center + amplitude * sin(step * phase_increment) + noise`,
/// truncated toward zero.
pub fn normal<R: Rng + ?Sized>(step: u64, params: &NormalParams, rng: &mut R) -> i64 {
    let phase = step as f64 * params.phase_increment;
    let wave = params.center as f64 + params.amplitude * phase.sin();
    let noise = rng.random_range(-params.noise..=params.noise);
    (wave + noise as f64) as i64
}

/// High spike or low drop, each uniform within its band.
pub fn anomaly<R: Rng + ?Sized>(params: &AnomalyParams, rng: &mut R) -> i64 {
    if rng.random_bool(params.high_probability) {
        rng.random_range(params.high_min..=params.high_max)
    } else {
        rng.random_range(params.low_min..=params.low_max)
    }
}

/// Baseline plus uniform noise.
pub fn idle<R: Rng + ?Sized>(params: &IdleParams, rng: &mut R) -> i64 {
    params
        .baseline
        .saturating_add(rng.random_range(-params.noise..=params.noise))
}

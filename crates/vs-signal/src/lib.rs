//! Synthetic sensor signal sources.
//!
//! This crate produces the raw readings that the generator publishes. Each
//! [`Mode`] selects one regime of a simulated 12-bit sensor:
//! - **Normal**: a noisy sine wave around mid-scale, phase driven by a step counter
//! - **Anomaly**: extreme spikes or drops that a fault detector must flag
//! - **Idle**: low, steady noise around a fixed baseline
//!
//! # Design Principles
//!
//! - **Injected randomness**: every function takes its random source as an
//!   argument so tests can run against a seeded generator
//! - **Unclamped output**: functions return raw `i64` values; clamping into the
//!   ADC range is the caller's job (see [`vs_core::clamp_adc`])
//! - **Tunable**: waveform constants live in [`WaveformParams`] with defaults
//!   matching the reference sensor profile

pub mod error;
pub mod generator;
pub mod mode;
pub mod params;
pub mod waveform;

pub use error::{SignalError, SignalResult};
pub use generator::SignalGenerator;
pub use mode::Mode;
pub use params::{AnomalyParams, IdleParams, NormalParams, PARAM_LIMIT, WaveformParams};
pub use waveform::{anomaly, idle, normal};

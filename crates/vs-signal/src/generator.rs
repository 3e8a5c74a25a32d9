//! Mode-dispatching signal source.

use rand::Rng;

use crate::error::SignalResult;
use crate::mode::Mode;
use crate::params::WaveformParams;
use crate::waveform;

/// Owns the waveform parameters and the random source.
///
/// The step counter is not kept here; callers pass it in so that the session
/// that owns it decides when it advances.
#[derive(Debug, Clone)]
pub struct SignalGenerator<R> {
    params: WaveformParams,
    rng: R,
}

impl<R: Rng> SignalGenerator<R> {
    /// Create a generator, rejecting invalid parameters.
    pub fn new(params: WaveformParams, rng: R) -> SignalResult<Self> {
        params.validate()?;
        Ok(Self { params, rng })
    }

    pub fn params(&self) -> &WaveformParams {
        &self.params
    }

    /// Produce one raw (unclamped) reading for `mode`.
    ///
    /// `step` is only used by [`Mode::Normal`].
    pub fn sample(&mut self, mode: Mode, step: u64) -> i64 {
        match mode {
            Mode::Normal => waveform::normal(step, &self.params.normal, &mut self.rng),
            Mode::Anomaly => waveform::anomaly(&self.params.anomaly, &mut self.rng),
            Mode::Idle => waveform::idle(&self.params.idle, &mut self.rng),
        }
    }
}

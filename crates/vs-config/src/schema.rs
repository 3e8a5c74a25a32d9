//! Config schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vs_signal::WaveformParams;

/// Current config file version.
pub const LATEST_VERSION: u32 = 1;

/// Longest accepted pause between samples, in seconds.
pub const MAX_DELAY_S: f64 = 3600.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub version: u32,
    pub broker: BrokerConfig,
    pub burst: BurstConfig,
    pub signal: WaveformParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            broker: BrokerConfig::default(),
            burst: BurstConfig::default(),
            signal: WaveformParams::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    /// Topic every sample is published to, whatever the mode.
    pub topic: String,
    pub client_id: String,
    pub keepalive_s: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "test.mosquitto.org".to_string(),
            port: 1883,
            topic: "virtusense/unique_id_123/signal_input".to_string(),
            client_id: "VirtuSense_Py_Gen_Fixed".to_string(),
            keepalive_s: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BurstConfig {
    /// Samples per operator command.
    pub size: usize,
    /// Pause after each sample, in seconds.
    pub delay_s: f64,
}

impl BurstConfig {
    /// Pause as a `Duration`; values too large to represent become `Duration::MAX`.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_s.max(0.0)).unwrap_or(Duration::MAX)
    }
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            size: 20,
            delay_s: 0.5,
        }
    }
}

//! Signal modes and operator command mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// Signal regime selected for one burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Healthy sensor: sine wave in the safe zone.
    Normal,
    /// Faulty sensor: spikes above or drops below the safe zone.
    Anomaly,
    /// Sensor at rest: low steady noise.
    Idle,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::Anomaly, Mode::Idle];

    /// Status label shown next to every transmitted value.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Anomaly => "FAULT !!!",
            Self::Idle => "IDLE",
        }
    }

    /// Single-letter operator command.
    pub fn command(&self) -> char {
        match self {
            Self::Normal => 'n',
            Self::Anomaly => 'a',
            Self::Idle => 'i',
        }
    }

    /// Whether a sample in this mode advances the step counter.
    pub fn advances_step(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Parse one line of operator input.
    ///
    /// The line is trimmed and lowercased; only `n`, `a` and `i` are accepted.
    pub fn parse_command(line: &str) -> Result<Self, SignalError> {
        match line.trim().to_lowercase().as_str() {
            "n" => Ok(Self::Normal),
            "a" => Ok(Self::Anomaly),
            "i" => Ok(Self::Idle),
            other => Err(SignalError::UnknownMode {
                input: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Anomaly => "anomaly",
            Self::Idle => "idle",
        };
        f.write_str(name)
    }
}

/// Accepts both the command letters and the long mode names.
impl FromStr for Mode {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "anomaly" | "fault" => Ok(Self::Anomaly),
            "idle" => Ok(Self::Idle),
            _ => Self::parse_command(s),
        }
    }
}

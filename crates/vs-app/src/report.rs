use chrono::{DateTime, Local};
use vs_core::AdcSample;
use vs_signal::Mode;

/// Outcome of one burst.
#[derive(Debug, Clone)]
pub struct BurstReport {
    pub mode: Mode,
    pub started_at: DateTime<Local>,
    /// Samples the publisher accepted.
    pub published: usize,
    /// Samples the publisher rejected.
    pub failed: usize,
    pub first: Option<AdcSample>,
    pub last: Option<AdcSample>,
    pub min: Option<AdcSample>,
    pub max: Option<AdcSample>,
    /// Burst was cut short by an operator interrupt.
    pub interrupted: bool,
}

impl BurstReport {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            started_at: Local::now(),
            published: 0,
            failed: 0,
            first: None,
            last: None,
            min: None,
            max: None,
            interrupted: false,
        }
    }

    /// Record one emitted sample, whether or not the publish succeeded.
    pub fn record(&mut self, sample: AdcSample, accepted: bool) {
        if accepted {
            self.published += 1;
        } else {
            self.failed += 1;
        }
        self.first.get_or_insert(sample);
        self.last = Some(sample);
        self.min = Some(self.min.map_or(sample, |m| m.min(sample)));
        self.max = Some(self.max.map_or(sample, |m| m.max(sample)));
    }

    /// Samples emitted, including failed publishes.
    pub fn emitted(&self) -> usize {
        self.published + self.failed
    }
}

/// Totals over a whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub bursts: usize,
    pub samples_published: usize,
    pub publish_failures: usize,
    pub invalid_commands: usize,
    pub final_step: u64,
}

impl SessionSummary {
    pub fn absorb(&mut self, report: &BurstReport) {
        self.bursts += 1;
        self.samples_published += report.published;
        self.publish_failures += report.failed;
    }
}

//! Interactive session loop.
//!
//! The session owns the step counter, the publisher and the signal source.
//! It moves between three states:
//!
//! - `AwaitingCommand`: wait for one console event. A valid command starts a
//!   burst, anything else prints a usage line and waits again.
//! - `Emitting`: publish `burst.size` clamped samples, pausing `burst.delay`
//!   after each. An interrupt during a pause ends the burst and the session.
//! - `Terminated`: print the disconnect notice and release the publisher.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};
use vs_config::{BurstConfig, GeneratorConfig, validate_config};
use vs_core::AdcSample;
use vs_signal::{Mode, SignalGenerator};

use crate::console::ConsoleEvent;
use crate::error::AppResult;
use crate::publisher::Publisher;
use crate::report::{BurstReport, SessionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingCommand,
    Emitting(Mode),
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Burst(Mode),
    Invalid,
}

pub struct Session<P, R> {
    topic: String,
    burst: BurstConfig,
    publisher: P,
    generator: SignalGenerator<R>,
    step: u64,
    state: SessionState,
    /// Events that arrived while a burst was running.
    pending: VecDeque<ConsoleEvent>,
    summary: SessionSummary,
}

impl<P: Publisher, R: Rng> Session<P, R> {
    /// Build a session around an already connected publisher.
    pub fn new(config: &GeneratorConfig, publisher: P, rng: R) -> AppResult<Self> {
        validate_config(config)?;
        let generator = SignalGenerator::new(config.signal.clone(), rng)?;
        Ok(Self {
            topic: config.broker.topic.clone(),
            burst: config.burst.clone(),
            publisher,
            generator,
            step: 0,
            state: SessionState::AwaitingCommand,
            pending: VecDeque::new(),
            summary: SessionSummary::default(),
        })
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Map one line of operator input to the next action.
    pub fn handle_command(&mut self, line: &str) -> CommandOutcome {
        match Mode::parse_command(line) {
            Ok(mode) => CommandOutcome::Burst(mode),
            Err(e) => {
                self.summary.invalid_commands += 1;
                warn!(error = %e, "invalid operator command");
                CommandOutcome::Invalid
            }
        }
    }

    /// Run the full command loop until end of input or an interrupt.
    pub fn run<W: Write>(
        &mut self,
        events: &Receiver<ConsoleEvent>,
        out: &mut W,
    ) -> AppResult<SessionSummary> {
        write_banner(out, self.burst.size)?;

        while self.state != SessionState::Terminated {
            write!(out, "\nEnter Command (n/a/i): ")?;
            out.flush()?;

            match self.next_event(events) {
                ConsoleEvent::Line(line) => match self.handle_command(&line) {
                    CommandOutcome::Burst(mode) => {
                        let report = self.run_burst(mode, events, out)?;
                        info!(
                            mode = %report.mode,
                            published = report.published,
                            failed = report.failed,
                            interrupted = report.interrupted,
                            "burst finished"
                        );
                    }
                    CommandOutcome::Invalid => {
                        writeln!(out, "Invalid command. Please use 'n', 'a', or 'i'.")?;
                    }
                },
                ConsoleEvent::Eof | ConsoleEvent::Interrupt => {
                    self.state = SessionState::Terminated;
                }
            }
        }

        self.finish(out)
    }

    /// Emit one burst of `burst.size` samples in `mode`.
    ///
    /// Publish failures are logged and counted; they do not stop the burst.
    /// Console lines received during the burst are kept for the command loop.
    pub fn run_burst<W: Write>(
        &mut self,
        mode: Mode,
        events: &Receiver<ConsoleEvent>,
        out: &mut W,
    ) -> AppResult<BurstReport> {
        self.state = SessionState::Emitting(mode);
        writeln!(
            out,
            "--> Injecting {} packets for mode: {}...",
            self.burst.size,
            mode.label()
        )?;
        info!(mode = %mode, size = self.burst.size, step = self.step, "burst started");

        let mut report = BurstReport::new(mode);
        for _ in 0..self.burst.size {
            let sample = AdcSample::from_raw(self.generator.sample(mode, self.step));
            let payload = sample.to_string();

            let accepted = match self.publisher.publish(&self.topic, &payload) {
                Ok(()) => {
                    debug!(topic = %self.topic, payload = %payload, "published");
                    true
                }
                Err(e) => {
                    warn!(error = %e, payload = %payload, "publish failed");
                    false
                }
            };
            report.record(sample, accepted);

            writeln!(out, "TX -> {} [{}]", sample.padded(), mode.label())?;
            out.flush()?;

            if mode.advances_step() {
                self.step += 1;
            }

            if self.pause(events, self.burst.delay()) {
                report.interrupted = true;
                break;
            }
        }

        self.summary.absorb(&report);
        self.state = if report.interrupted {
            SessionState::Terminated
        } else {
            SessionState::AwaitingCommand
        };
        Ok(report)
    }

    /// Print the disconnect notice and release the publisher.
    pub fn finish<W: Write>(&mut self, out: &mut W) -> AppResult<SessionSummary> {
        self.state = SessionState::Terminated;
        let notice = writeln!(out, "\nDisconnected.").and_then(|_| out.flush());
        self.publisher.disconnect();
        self.summary.final_step = self.step;
        info!(
            bursts = self.summary.bursts,
            published = self.summary.samples_published,
            failures = self.summary.publish_failures,
            "session ended"
        );
        notice?;
        Ok(self.summary.clone())
    }

    fn next_event(&mut self, events: &Receiver<ConsoleEvent>) -> ConsoleEvent {
        if let Some(event) = self.pending.pop_front() {
            return event;
        }
        // every sender gone means no more input can arrive
        events.recv().unwrap_or(ConsoleEvent::Eof)
    }

    /// Wait for `delay`, returning `true` if an interrupt arrived meanwhile.
    fn pause(&mut self, events: &Receiver<ConsoleEvent>, delay: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(delay) else {
            return self.wait_for_interrupt(events);
        };
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match events.recv_timeout(remaining) {
                Ok(ConsoleEvent::Interrupt) => return true,
                Ok(event) => self.pending.push_back(event),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => {
                    thread::sleep(remaining);
                    return false;
                }
            }
        }
    }

    /// Unbounded pause: only an interrupt or a closed console ends it.
    fn wait_for_interrupt(&mut self, events: &Receiver<ConsoleEvent>) -> bool {
        loop {
            match events.recv() {
                Ok(ConsoleEvent::Interrupt) => return true,
                Ok(event) => self.pending.push_back(event),
                Err(_) => return false,
            }
        }
    }
}

fn write_banner<W: Write>(out: &mut W, size: usize) -> std::io::Result<()> {
    writeln!(out, "\n--- VIRTUSENSE CONTROL PANEL ---")?;
    writeln!(out, "Instructions:")?;
    writeln!(
        out,
        " 1. Type 'n' and Enter -> Sends {size} packets of NORMAL Sine Wave"
    )?;
    writeln!(
        out,
        " 2. Type 'a' and Enter -> Sends {size} packets of DANGER Spikes"
    )?;
    writeln!(
        out,
        " 3. Type 'i' and Enter -> Sends {size} packets of IDLE Noise"
    )?;
    writeln!(out, "--------------------------------")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::MemoryPublisher;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::mpsc::channel;

    fn fast_config() -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        config.burst.delay_s = 0.0;
        config
    }

    fn session() -> Session<MemoryPublisher, StdRng> {
        Session::new(&fast_config(), MemoryPublisher::new(), StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn handle_command_counts_invalid_input() {
        let mut s = session();
        assert_eq!(s.handle_command(" N "), CommandOutcome::Burst(Mode::Normal));
        assert_eq!(s.handle_command("x"), CommandOutcome::Invalid);
        assert_eq!(s.handle_command(""), CommandOutcome::Invalid);
        assert_eq!(s.summary().invalid_commands, 2);
    }

    #[test]
    fn step_advances_only_in_normal_mode() {
        let (_tx, rx) = channel();
        let mut s = session();
        let mut sink = Vec::new();

        s.run_burst(Mode::Anomaly, &rx, &mut sink).unwrap();
        assert_eq!(s.step(), 0);
        s.run_burst(Mode::Normal, &rx, &mut sink).unwrap();
        assert_eq!(s.step(), 20);
        s.run_burst(Mode::Idle, &rx, &mut sink).unwrap();
        assert_eq!(s.step(), 20);
        s.run_burst(Mode::Normal, &rx, &mut sink).unwrap();
        assert_eq!(s.step(), 40);
    }

    #[test]
    fn burst_publishes_exactly_burst_size() {
        let (_tx, rx) = channel();
        let mut s = session();
        let mut sink = Vec::new();

        let report = s.run_burst(Mode::Idle, &rx, &mut sink).unwrap();
        assert_eq!(report.published, 20);
        assert!(!report.interrupted);
        assert_eq!(s.state(), SessionState::AwaitingCommand);
        assert_eq!(s.publisher().messages.len(), 20);
        assert!(
            s.publisher()
                .messages
                .iter()
                .all(|(topic, _)| topic == "virtusense/unique_id_123/signal_input")
        );
    }

    #[test]
    fn publish_failures_do_not_stop_the_burst() {
        let (_tx, rx) = channel();
        let mut publisher = MemoryPublisher::new();
        publisher.fail_next(3);
        let mut s = Session::new(&fast_config(), publisher, StdRng::seed_from_u64(1)).unwrap();
        let mut sink = Vec::new();

        let report = s.run_burst(Mode::Normal, &rx, &mut sink).unwrap();
        assert_eq!(report.failed, 3);
        assert_eq!(report.published, 17);
        assert_eq!(s.publisher().attempts, 20);
        assert_eq!(s.step(), 20);

        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.matches("TX -> ").count(), 20);
    }

    #[test]
    fn status_lines_are_zero_padded() {
        let (_tx, rx) = channel();
        let mut config = fast_config();
        config.signal.idle.baseline = 7;
        config.signal.idle.noise = 0;
        let mut s = Session::new(&config, MemoryPublisher::new(), StdRng::seed_from_u64(0)).unwrap();
        let mut sink = Vec::new();

        s.run_burst(Mode::Idle, &rx, &mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("TX -> 0007 [IDLE]"));
        assert!(s.publisher().messages.iter().all(|(_, p)| p == "7"));
    }

    #[test]
    fn out_of_range_levels_are_clamped_before_publishing() {
        let (_tx, rx) = channel();
        let cases = [
            (-100, "0", "TX -> 0000 [IDLE]"),
            (5000, "4095", "TX -> 4095 [IDLE]"),
        ];
        for (baseline, expected, line) in cases {
            let mut config = fast_config();
            config.signal.idle.baseline = baseline;
            config.signal.idle.noise = 0;
            let mut s =
                Session::new(&config, MemoryPublisher::new(), StdRng::seed_from_u64(0)).unwrap();
            let mut sink = Vec::new();

            let report = s.run_burst(Mode::Idle, &rx, &mut sink).unwrap();
            assert_eq!(report.published, 20);
            assert!(s.publisher().messages.iter().all(|(_, p)| p == expected));
            let text = String::from_utf8(sink).unwrap();
            assert_eq!(text.matches(line).count(), 20);
        }
    }

    #[test]
    fn unrepresentable_pause_still_ends_on_interrupt() {
        let (tx, rx) = channel();
        tx.send(ConsoleEvent::Line("a".to_string())).unwrap();
        tx.send(ConsoleEvent::Interrupt).unwrap();
        let mut s = session();

        assert!(s.pause(&rx, Duration::MAX));
        assert_eq!(s.next_event(&rx), ConsoleEvent::Line("a".to_string()));
    }

    #[test]
    fn unrepresentable_pause_ends_when_console_closes() {
        let (tx, rx) = channel::<ConsoleEvent>();
        drop(tx);
        let mut s = session();

        assert!(!s.pause(&rx, Duration::MAX));
    }

    #[test]
    fn lines_during_burst_are_kept_in_order() {
        let (tx, rx) = channel();
        tx.send(ConsoleEvent::Line("a".to_string())).unwrap();
        tx.send(ConsoleEvent::Line("i".to_string())).unwrap();
        let mut s = session();
        let mut sink = Vec::new();

        s.run_burst(Mode::Normal, &rx, &mut sink).unwrap();
        assert_eq!(s.next_event(&rx), ConsoleEvent::Line("a".to_string()));
        assert_eq!(s.next_event(&rx), ConsoleEvent::Line("i".to_string()));
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = fast_config();
        config.burst.size = 0;
        assert!(Session::new(&config, MemoryPublisher::new(), StdRng::seed_from_u64(0)).is_err());
    }
}

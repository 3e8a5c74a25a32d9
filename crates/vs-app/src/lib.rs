//! Session service layer for the virtusense signal generator.
//!
//! This crate wires the signal sources to a broker: it owns the publisher
//! contract and its MQTT implementation, the console event stream that feeds
//! operator commands and interrupts, and the session loop that turns each
//! command into a timed burst of published readings.

pub mod console;
pub mod error;
pub mod mqtt;
pub mod publisher;
pub mod report;
pub mod session;

// Re-export key types for convenience
pub use console::{ConsoleEvent, install_interrupt_handler, spawn_line_reader, spawn_stdin_reader};
pub use error::{AppError, AppResult};
pub use mqtt::MqttPublisher;
pub use publisher::{ConnectError, ConsolePublisher, MemoryPublisher, PublishError, Publisher};
pub use report::{BurstReport, SessionSummary};
pub use session::{CommandOutcome, Session, SessionState};

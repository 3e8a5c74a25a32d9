//! Publisher contract and the non-network implementations.
//!
//! A publisher is created connected (each implementation has its own
//! `connect` constructor), publishes string payloads to a topic, and is
//! disconnected once when the session ends.

use thiserror::Error;
use tracing::debug;

/// Broker connection could not be established.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("could not connect to {host}:{port}: {reason}")]
pub struct ConnectError {
    pub host: String,
    pub port: u16,
    pub reason: String,
}

/// A single publish did not reach the transport.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PublishError {
    #[error("publisher is disconnected")]
    Disconnected,

    #[error("publish rejected: {reason}")]
    Rejected { reason: String },
}

pub trait Publisher {
    /// Hand one payload to the transport.
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError>;

    /// Release the connection. Calling it more than once is a no-op.
    fn disconnect(&mut self);
}

impl<P: Publisher + ?Sized> Publisher for Box<P> {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError> {
        (**self).publish(topic, payload)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }
}

/// Dry-run publisher: payloads go to the log instead of a broker.
#[derive(Debug, Default)]
pub struct ConsolePublisher {
    published: usize,
    disconnected: bool,
}

impl ConsolePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> usize {
        self.published
    }
}

impl Publisher for ConsolePublisher {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError> {
        if self.disconnected {
            return Err(PublishError::Disconnected);
        }
        debug!(topic, payload, "dry-run publish");
        self.published += 1;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.disconnected = true;
    }
}

/// In-memory publisher that records every message.
///
/// Can be told to reject a number of upcoming publishes.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    pub messages: Vec<(String, String)>,
    pub attempts: usize,
    pub disconnect_calls: usize,
    fail_next: usize,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `n` publishes.
    pub fn fail_next(&mut self, n: usize) {
        self.fail_next = n;
    }

    pub fn payloads(&self) -> Vec<i64> {
        self.messages
            .iter()
            .filter_map(|(_, payload)| payload.parse().ok())
            .collect()
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnect_calls > 0
    }
}

impl Publisher for MemoryPublisher {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError> {
        self.attempts += 1;
        if self.is_disconnected() {
            return Err(PublishError::Disconnected);
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(PublishError::Rejected {
                reason: "injected failure".to_string(),
            });
        }
        self.messages.push((topic.to_string(), payload.to_string()));
        Ok(())
    }

    fn disconnect(&mut self) {
        self.disconnect_calls += 1;
    }
}

//! Config validation logic.

use crate::schema::{GeneratorConfig, LATEST_VERSION, MAX_DELAY_S};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid signal parameters: {0}")]
    Signal(#[from] vs_signal::SignalError),

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &GeneratorConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    let broker = &config.broker;
    require_non_empty("broker.host", &broker.host)?;
    require_non_empty("broker.client_id", &broker.client_id)?;
    require_non_empty("broker.topic", &broker.topic)?;
    if broker.topic.contains(['+', '#']) {
        return Err(invalid(
            "broker.topic",
            &broker.topic,
            "wildcards are not allowed in a publish topic",
        ));
    }
    if broker.port == 0 {
        return Err(invalid("broker.port", "0", "must be a valid TCP port"));
    }
    if broker.keepalive_s == 0 {
        return Err(invalid("broker.keepalive_s", "0", "must be at least 1 second"));
    }

    let burst = &config.burst;
    if burst.size == 0 {
        return Err(invalid("burst.size", "0", "must send at least one sample"));
    }
    if !burst.delay_s.is_finite() || burst.delay_s < 0.0 || burst.delay_s > MAX_DELAY_S {
        return Err(invalid(
            "burst.delay_s",
            &burst.delay_s.to_string(),
            &format!("must be between 0 and {MAX_DELAY_S} seconds"),
        ));
    }

    config.signal.validate()?;
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "must not be empty"));
    }
    Ok(())
}

fn invalid(field: &str, value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

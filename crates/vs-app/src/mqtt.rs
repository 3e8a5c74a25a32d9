//! MQTT publisher backed by the rumqttc synchronous client.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use rumqttc::{Client, Connection, Event, MqttOptions, Outgoing, Packet, QoS};
use tracing::{debug, info, warn};
use vs_config::BrokerConfig;

use crate::publisher::{ConnectError, PublishError, Publisher};

/// Pending request capacity between the client handle and the event loop.
const REQUEST_CAPACITY: usize = 64;

/// Publish-only MQTT connection.
///
/// Messages go out at QoS 0 and are not retained. The rumqttc event loop is
/// driven on a background thread once the broker has acknowledged the
/// connection.
pub struct MqttPublisher {
    client: Client,
    driver: Option<JoinHandle<()>>,
    disconnected: bool,
}

impl MqttPublisher {
    /// Connect and block until the broker sends CONNACK.
    ///
    /// Any event loop error before the acknowledgement is returned as a
    /// [`ConnectError`]; there is no retry.
    pub fn connect(broker: &BrokerConfig) -> Result<Self, ConnectError> {
        let mut options =
            MqttOptions::new(broker.client_id.as_str(), broker.host.as_str(), broker.port);
        options.set_keep_alive(Duration::from_secs(broker.keepalive_s));
        options.set_clean_session(true);

        let (client, mut connection) = Client::new(options, REQUEST_CAPACITY);
        wait_for_connack(&mut connection, broker)?;
        info!(host = %broker.host, port = broker.port, client_id = %broker.client_id, "connected to broker");

        let driver = thread::Builder::new()
            .name("mqtt-event-loop".to_string())
            .spawn(move || drive(connection))
            .map_err(|e| connect_error(broker, e.to_string()))?;

        Ok(Self {
            client,
            driver: Some(driver),
            disconnected: false,
        })
    }
}

impl Publisher for MqttPublisher {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError> {
        if self.disconnected {
            return Err(PublishError::Disconnected);
        }
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())
            .map_err(|e| PublishError::Rejected {
                reason: e.to_string(),
            })
    }

    fn disconnect(&mut self) {
        if self.disconnected {
            return;
        }
        self.disconnected = true;
        if let Err(e) = self.client.disconnect() {
            debug!(error = %e, "disconnect request not delivered");
        }
        if let Some(handle) = self.driver.take() {
            if handle.join().is_err() {
                warn!("mqtt event loop thread panicked");
            }
        }
        info!("disconnected from broker");
    }
}

impl Drop for MqttPublisher {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn wait_for_connack(connection: &mut Connection, broker: &BrokerConfig) -> Result<(), ConnectError> {
    for notification in connection.iter() {
        match notification {
            Ok(Event::Incoming(Packet::ConnAck(_))) => return Ok(()),
            Ok(event) => debug!(?event, "waiting for connack"),
            Err(e) => return Err(connect_error(broker, e.to_string())),
        }
    }
    Err(connect_error(
        broker,
        "connection closed before acknowledgement".to_string(),
    ))
}

fn drive(mut connection: Connection) {
    for notification in connection.iter() {
        match notification {
            Ok(Event::Outgoing(Outgoing::Disconnect)) => break,
            Ok(event) => debug!(?event, "mqtt event"),
            Err(e) => {
                warn!(error = %e, "mqtt connection lost");
                break;
            }
        }
    }
}

fn connect_error(broker: &BrokerConfig, reason: String) -> ConnectError {
    ConnectError {
        host: broker.host.clone(),
        port: broker.port,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_connection_is_reported() {
        // Port 1 on loopback has nothing listening.
        let broker = BrokerConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..BrokerConfig::default()
        };
        let err = MqttPublisher::connect(&broker).err().expect("connect should fail");
        assert_eq!(err.host, "127.0.0.1");
        assert_eq!(err.port, 1);
        assert!(!err.reason.is_empty());
    }
}

//! Broker connection with liveness observation.

use crate::config::BrokerSettings;
use crate::error::JobStreamError;
use async_nats::jetstream::Context;
use async_nats::{Client, Event};
use tracing::{debug, info, warn};

/// Observed connection state, read by workers before each fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// A NATS session plus its JetStream context.
///
/// Connection loss is never surfaced as an error to callers; it is observed
/// through [`BrokerConnection::is_connected`] and healed by the worker loop
/// rebuilding its session. The registered event callback only logs transport
/// faults and pauses briefly so a flapping link does not spin.
#[derive(Clone)]
pub struct BrokerConnection {
    client: Client,
    jetstream: Context,
}

impl BrokerConnection {
    /// Establish a session with the broker.
    ///
    /// Fails only on the initial connect; once established, the client
    /// reconnects on its own and state is exposed through
    /// [`BrokerConnection::state`].
    pub async fn connect(settings: &BrokerSettings) -> Result<Self, JobStreamError> {
        info!(url = %settings.url, "Connecting to NATS");

        let fault_pause = settings.fault_pause;
        let client = async_nats::ConnectOptions::new()
            .name(&settings.connection_name)
            .event_callback(move |event| async move {
                match event {
                    Event::Connected => {
                        info!("NATS connection established");
                    }
                    Event::Disconnected => {
                        warn!("NATS connection lost");
                        tokio::time::sleep(fault_pause).await;
                    }
                    Event::ClientError(err) => {
                        warn!(error = %err, "NATS client error");
                        tokio::time::sleep(fault_pause).await;
                    }
                    // Slow-consumer lag and other advisories are benign
                    other => {
                        debug!(event = %other, "NATS connection event");
                    }
                }
            })
            .connect(&settings.url)
            .await?;

        let jetstream = async_nats::jetstream::new(client.clone());

        Ok(Self { client, jetstream })
    }

    /// Get the underlying client.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Get the JetStream context.
    pub fn jetstream(&self) -> &Context {
        &self.jetstream
    }

    /// Observed connection state. Non-blocking.
    pub fn state(&self) -> ConnectionState {
        match self.client.connection_state() {
            async_nats::connection::State::Connected => ConnectionState::Connected,
            async_nats::connection::State::Pending => ConnectionState::Connecting,
            _ => ConnectionState::Disconnected,
        }
    }

    /// Whether the session is currently usable. Non-blocking.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Flush buffered messages and drop the session.
    ///
    /// Never fails the shutdown path; flush errors are logged and the
    /// connection is torn down regardless.
    pub async fn close(self) {
        if let Err(e) = self.client.flush().await {
            debug!(error = %e, "Flush on close failed");
        }
    }
}

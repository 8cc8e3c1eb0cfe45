//! NATS test broker
//!
//! Starts a disposable NATS container with JetStream enabled and hands out
//! clients and JetStream contexts for tests.

use async_nats::Client;
use async_nats::jetstream::Context;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::nats::Nats;

/// A NATS broker running in a container for the duration of a test.
///
/// JetStream is enabled so tests can provision streams and durable
/// consumers. The container is stopped and removed when this is dropped.
pub struct TestNats {
    #[allow(dead_code)]
    container: ContainerAsync<Nats>,
    client: Client,
    connection_string: String,
}

impl TestNats {
    /// Start a broker and connect a client to it.
    pub async fn new() -> Self {
        // The -js flag turns JetStream on
        let image = Nats::default().with_tag("latest").with_cmd(["-js"]);

        let container = image.start().await.expect("Failed to start NATS container");

        let host_port = container
            .get_host_port_ipv4(4222)
            .await
            .expect("Failed to get NATS port");

        let connection_string = format!("nats://127.0.0.1:{}", host_port);

        let client = async_nats::connect(&connection_string)
            .await
            .expect("Failed to connect to NATS");

        tracing::info!(port = host_port, "Test NATS ready with JetStream");

        Self {
            container,
            client,
            connection_string,
        }
    }

    /// A cloned client for passing into services under test.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// A JetStream context over the test broker.
    pub fn jetstream(&self) -> Context {
        async_nats::jetstream::new(self.client.clone())
    }

    /// Connection URL for code that dials the broker itself.
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestNats {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test NATS container");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let nats = TestNats::new().await;
        let client = nats.client();

        let mut subscriber = client.subscribe("ping").await.unwrap();
        client.publish("ping", "pong".into()).await.unwrap();
        client.flush().await.unwrap();

        let message = tokio::time::timeout(
            tokio::time::Duration::from_secs(5),
            subscriber.next(),
        )
        .await
        .expect("Timeout waiting for message")
        .expect("No message received");

        assert_eq!(message.payload.as_ref(), b"pong");
    }

    #[tokio::test]
    async fn test_jetstream_stream_holds_messages() {
        let nats = TestNats::new().await;
        let jetstream = nats.jetstream();

        jetstream
            .create_stream(async_nats::jetstream::stream::Config {
                name: "SMOKE".to_string(),
                subjects: vec!["smoke.>".to_string()],
                ..Default::default()
            })
            .await
            .expect("Failed to create stream");

        let ack = jetstream
            .publish("smoke.test", "payload".into())
            .await
            .expect("Failed to publish")
            .await
            .expect("Failed to get ack");
        assert!(ack.sequence > 0);

        let mut stream = jetstream.get_stream("SMOKE").await.unwrap();
        let info = stream.info().await.unwrap();
        assert_eq!(info.state.messages, 1);
    }
}

//! Configuration for brokers, streams and workers.

use crate::provision::StreamSpec;
use std::time::Duration;

/// Broker connection settings.
#[derive(Debug, Clone)]
pub struct BrokerSettings {
    /// NATS server URL
    pub url: String,

    /// Connection name advertised to the server
    pub connection_name: String,

    /// Pause applied by the connection event callback after a transport
    /// fault, so a flapping link does not hot-loop the logs
    pub fault_pause: Duration,
}

impl BrokerSettings {
    /// Create settings for the given server URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the connection name.
    pub fn with_connection_name(mut self, name: impl Into<String>) -> Self {
        self.connection_name = name.into();
        self
    }

    /// Set the fault pause applied by the connection event callback.
    pub fn with_fault_pause(mut self, pause: Duration) -> Self {
        self.fault_pause = pause;
        self
    }
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
            connection_name: "jobstream-worker".to_string(),
            fault_pause: Duration::from_secs(30),
        }
    }
}

/// Stream definition trait (type-safe constants).
///
/// Implement this trait to define a stream's topology in one place.
///
/// # Example
///
/// ```rust,ignore
/// struct SummarizationStream;
///
/// impl StreamDef for SummarizationStream {
///     const STREAM_NAME: &'static str = "SUMMARIZATION_EVENT";
///     const SUBJECTS: &'static str = "SUMMARIZATION_EVENT.>";
///     const SUBJECT: &'static str = "SUMMARIZATION_EVENT.summarize";
///     const DURABLE_NAME: &'static str = "SUMMARIZATION";
/// }
/// ```
pub trait StreamDef {
    /// JetStream stream name
    const STREAM_NAME: &'static str;

    /// Subject wildcard bound to the stream (e.g., "EVENTS.>")
    const SUBJECTS: &'static str;

    /// Subject jobs are published to and the consumer filters on
    const SUBJECT: &'static str;

    /// Durable consumer name, shared by every worker instance so the
    /// broker load-balances deliveries across them
    const DURABLE_NAME: &'static str;

    /// Maximum delivery attempts before the broker stops redelivering
    /// (default: 3)
    const MAX_DELIVER: i64 = 3;

    /// Seconds before an unacknowledged delivery becomes eligible for
    /// redelivery (default: 30)
    const ACK_WAIT_SECS: u64 = 30;

    /// Ceiling on unacknowledged deliveries in flight across all workers
    /// (default: 1000)
    const MAX_ACK_PENDING: i64 = 1000;
}

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// JetStream stream name
    pub stream_name: String,

    /// Subject wildcard bound to the stream
    pub stream_subjects: String,

    /// Subject the durable consumer filters on
    pub filter_subject: String,

    /// Durable consumer name (shared across worker instances)
    pub durable_name: String,

    /// Batch size for fetching messages
    pub batch_size: usize,

    /// Bounded wait for a fetch; expiry with no messages is a normal
    /// idle cycle, not an error
    pub fetch_timeout: Duration,

    /// Maximum deliveries per message
    pub max_deliver: i64,

    /// Ack wait before redelivery
    pub ack_wait: Duration,

    /// Ceiling on unacknowledged in-flight deliveries
    pub max_ack_pending: i64,

    /// Sleep between polls when a fetch returns nothing or a job fails
    pub idle_backoff: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            stream_name: "JOBS".to_string(),
            stream_subjects: "JOBS.>".to_string(),
            filter_subject: "JOBS.>".to_string(),
            durable_name: "jobs-worker".to_string(),
            batch_size: 1,
            fetch_timeout: Duration::from_secs(5),
            max_deliver: 3,
            ack_wait: Duration::from_secs(30),
            max_ack_pending: 1000,
            idle_backoff: Duration::from_secs(1),
        }
    }
}

impl WorkerConfig {
    /// Create from a StreamDef trait.
    pub fn from_stream<S: StreamDef>() -> Self {
        Self {
            stream_name: S::STREAM_NAME.to_string(),
            stream_subjects: S::SUBJECTS.to_string(),
            filter_subject: S::SUBJECT.to_string(),
            durable_name: S::DURABLE_NAME.to_string(),
            max_deliver: S::MAX_DELIVER,
            ack_wait: Duration::from_secs(S::ACK_WAIT_SECS),
            max_ack_pending: S::MAX_ACK_PENDING,
            ..Default::default()
        }
    }

    /// Set the durable name.
    pub fn with_durable_name(mut self, name: impl Into<String>) -> Self {
        self.durable_name = name.into();
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the idle backoff.
    pub fn with_idle_backoff(mut self, backoff: Duration) -> Self {
        self.idle_backoff = backoff;
        self
    }

    /// The stream spec provisioned for this worker.
    pub fn stream_spec(&self) -> StreamSpec {
        StreamSpec::new(&self.stream_name, &self.stream_subjects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestStream;

    impl StreamDef for TestStream {
        const STREAM_NAME: &'static str = "TEST_JOBS";
        const SUBJECTS: &'static str = "TEST_JOBS.>";
        const SUBJECT: &'static str = "TEST_JOBS.run";
        const DURABLE_NAME: &'static str = "test-worker";
        const MAX_DELIVER: i64 = 5;
        const ACK_WAIT_SECS: u64 = 120;
        const MAX_ACK_PENDING: i64 = 2;
    }

    #[test]
    fn test_config_from_stream() {
        let config = WorkerConfig::from_stream::<TestStream>();
        assert_eq!(config.stream_name, "TEST_JOBS");
        assert_eq!(config.stream_subjects, "TEST_JOBS.>");
        assert_eq!(config.filter_subject, "TEST_JOBS.run");
        assert_eq!(config.durable_name, "test-worker");
        assert_eq!(config.max_deliver, 5);
        assert_eq!(config.ack_wait, Duration::from_secs(120));
        assert_eq!(config.max_ack_pending, 2);
        // Fields the stream definition does not cover keep their defaults
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.idle_backoff, Duration::from_secs(1));
    }

    #[test]
    fn test_config_builder() {
        let config = WorkerConfig::from_stream::<TestStream>()
            .with_durable_name("override")
            .with_batch_size(4)
            .with_fetch_timeout(Duration::from_millis(500))
            .with_idle_backoff(Duration::from_millis(50));

        assert_eq!(config.durable_name, "override");
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.fetch_timeout, Duration::from_millis(500));
        assert_eq!(config.idle_backoff, Duration::from_millis(50));
    }

    #[test]
    fn test_stream_spec_from_config() {
        let spec = WorkerConfig::from_stream::<TestStream>().stream_spec();
        assert_eq!(spec.name, "TEST_JOBS");
        assert_eq!(spec.subjects, vec!["TEST_JOBS.>".to_string()]);
    }

    #[test]
    fn test_broker_settings_builder() {
        let settings = BrokerSettings::new("nats://broker:4222")
            .with_connection_name("summarizer")
            .with_fault_pause(Duration::from_secs(5));

        assert_eq!(settings.url, "nats://broker:4222");
        assert_eq!(settings.connection_name, "summarizer");
        assert_eq!(settings.fault_pause, Duration::from_secs(5));
    }
}

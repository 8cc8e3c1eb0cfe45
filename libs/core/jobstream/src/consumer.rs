//! Durable pull consumer for receiving jobs.

use crate::config::WorkerConfig;
use crate::error::JobStreamError;
use crate::job::Job;
use async_nats::jetstream::AckKind;
use async_nats::jetstream::Context;
use async_nats::jetstream::consumer::AckPolicy;
use async_nats::jetstream::consumer::pull::Config as ConsumerConfig;
use futures::StreamExt;
use tracing::{debug, error, info, warn};

/// A handle to a durable pull consumer.
///
/// Attaching binds to the broker-persisted cursor by durable name, so a
/// re-attach after a disconnect resumes at the last unacknowledged
/// position. All worker instances attach to the same durable; the broker
/// load-balances deliveries among them.
pub struct JobConsumer {
    consumer: async_nats::jetstream::consumer::Consumer<ConsumerConfig>,
    config: WorkerConfig,
}

impl JobConsumer {
    /// Bind to the durable consumer, creating it if necessary.
    pub async fn attach(jetstream: &Context, config: &WorkerConfig) -> Result<Self, JobStreamError> {
        let stream = jetstream
            .get_stream(&config.stream_name)
            .await
            .map_err(JobStreamError::from_jetstream_error)?;

        // Try to get existing consumer
        let consumer = match stream
            .get_consumer::<ConsumerConfig>(&config.durable_name)
            .await
        {
            Ok(consumer) => {
                debug!(
                    consumer = %config.durable_name,
                    "Consumer already exists"
                );
                consumer
            }
            Err(_) => {
                info!(
                    consumer = %config.durable_name,
                    stream = %config.stream_name,
                    "Creating consumer"
                );

                stream
                    .create_consumer(ConsumerConfig {
                        durable_name: Some(config.durable_name.clone()),
                        name: Some(config.durable_name.clone()),
                        ack_policy: AckPolicy::Explicit,
                        ack_wait: config.ack_wait,
                        max_deliver: config.max_deliver,
                        max_ack_pending: config.max_ack_pending,
                        filter_subject: config.filter_subject.clone(),
                        ..Default::default()
                    })
                    .await
                    .map_err(JobStreamError::from_jetstream_error)?
            }
        };

        Ok(Self {
            consumer,
            config: config.clone(),
        })
    }

    /// Fetch up to `batch_size` messages with a bounded wait.
    ///
    /// Expiry with no messages is a normal idle cycle and yields an empty
    /// Vec. A payload that fails to decode is terminated: redelivery cannot
    /// fix it and leaving it pending would wedge a small in-flight ceiling.
    pub async fn fetch<J: Job>(&self) -> Result<Vec<Delivery<J>>, JobStreamError> {
        let mut messages = self
            .consumer
            .fetch()
            .max_messages(self.config.batch_size)
            .expires(self.config.fetch_timeout)
            .messages()
            .await
            .map_err(JobStreamError::from_jetstream_error)?;

        let mut result = Vec::new();

        while let Some(msg) = messages.next().await {
            match msg {
                Ok(message) => {
                    match serde_json::from_slice::<J>(&message.payload) {
                        Ok(job) => {
                            // Read delivery metadata before the message is consumed
                            let (stream_sequence, delivery_count) = match message.info() {
                                Ok(info) => (info.stream_sequence, info.delivered as u32),
                                Err(e) => {
                                    warn!(error = %e, "Message info unavailable, assuming first delivery");
                                    (0, 1)
                                }
                            };
                            result.push(Delivery {
                                job,
                                message,
                                stream_sequence,
                                delivery_count,
                            });
                        }
                        Err(e) => {
                            error!(
                                subject = %message.subject,
                                error = %e,
                                "Failed to decode job payload, terminating message"
                            );
                            if let Err(term_err) = message.ack_with(AckKind::Term).await {
                                warn!(error = %term_err, "Failed to terminate undecodable message");
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Error receiving message");
                }
            }
        }

        Ok(result)
    }
}

/// A message received from the stream with delivery metadata.
pub struct Delivery<J: Job> {
    /// The decoded job.
    pub job: J,
    /// The raw message (held for the acknowledgement).
    message: async_nats::jetstream::Message,
    /// Stream sequence number.
    pub stream_sequence: u64,
    /// Number of delivery attempts, starting at 1.
    pub delivery_count: u32,
}

impl<J: Job> Delivery<J> {
    /// Get the job ID.
    pub fn job_id(&self) -> String {
        self.job.job_id()
    }

    /// Check if this is a redelivery.
    pub fn is_redelivery(&self) -> bool {
        self.delivery_count > 1
    }

    /// Acknowledge the message after successful processing.
    pub async fn ack(self) -> Result<(), JobStreamError> {
        self.message
            .ack()
            .await
            .map_err(|e| JobStreamError::consumer_error(e.to_string()))
    }
}

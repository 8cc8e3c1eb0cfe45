//! Publishing jobs to the stream.

use crate::config::StreamDef;
use crate::error::JobStreamError;
use crate::job::Job;
use async_nats::jetstream::Context;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded exponential retry for publishes.
///
/// The delay after each failed attempt doubles and is clamped to
/// `[min_delay, max_delay]`; after `max_attempts` the publish fails with
/// [`JobStreamError::PublishRetriesExhausted`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay applied after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let doubled = Duration::from_secs(2u64.saturating_pow(attempt));
        doubled.clamp(self.min_delay, self.max_delay)
    }
}

/// Publisher for submitting jobs to a stream subject.
#[derive(Clone)]
pub struct JobPublisher {
    jetstream: Context,
    stream_name: String,
    subject: String,
    retry: RetryPolicy,
}

impl JobPublisher {
    /// Create a new publisher.
    pub fn new(
        jetstream: Context,
        stream_name: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            jetstream,
            stream_name: stream_name.into(),
            subject: subject.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Create a publisher from a StreamDef.
    pub fn from_stream<S: StreamDef>(jetstream: Context) -> Self {
        Self::new(jetstream, S::STREAM_NAME, S::SUBJECT)
    }

    /// Set the retry policy used by [`JobPublisher::publish_with_retry`].
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the subject jobs are published to.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Publish a job once.
    ///
    /// Returns the stream sequence number the broker assigned.
    pub async fn publish<J: Job>(&self, job: &J) -> Result<u64, JobStreamError> {
        let payload = serde_json::to_vec(job)?;
        let sequence = self.publish_payload(payload).await?;

        debug!(
            stream = %self.stream_name,
            subject = %self.subject,
            sequence = sequence,
            job_id = %job.job_id(),
            "Published job"
        );

        Ok(sequence)
    }

    /// Publish a job, retrying transient failures within the retry budget.
    ///
    /// Serialization failures are not retried; republishing the same
    /// payload cannot change the outcome.
    pub async fn publish_with_retry<J: Job>(&self, job: &J) -> Result<u64, JobStreamError> {
        let payload = serde_json::to_vec(job)?;
        let job_id = job.job_id();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.publish_payload(payload.clone()).await {
                Ok(sequence) => {
                    debug!(
                        stream = %self.stream_name,
                        subject = %self.subject,
                        sequence = sequence,
                        job_id = %job_id,
                        attempt = attempt,
                        "Published job"
                    );
                    return Ok(sequence);
                }
                Err(e) if attempt >= self.retry.max_attempts => {
                    return Err(JobStreamError::PublishRetriesExhausted {
                        subject: self.subject.clone(),
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = self.retry.delay(attempt);
                    warn!(
                        subject = %self.subject,
                        job_id = %job_id,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Publish failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn publish_payload(&self, payload: Vec<u8>) -> Result<u64, JobStreamError> {
        let ack = self
            .jetstream
            .publish(self.subject.clone(), payload.into())
            .await
            .map_err(|e| JobStreamError::publish_error(e.to_string()))?
            .await
            .map_err(|e| JobStreamError::publish_error(e.to_string()))?;

        Ok(ack.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.min_delay, Duration::from_secs(2));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
    }

    #[test]
    fn test_retry_delay_schedule() {
        let policy = RetryPolicy::default();
        // Doubles per attempt, clamped to [2s, 10s]
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));
        assert_eq!(policy.delay(3), Duration::from_secs(8));
        assert_eq!(policy.delay(4), Duration::from_secs(10));
        assert_eq!(policy.delay(30), Duration::from_secs(10));
    }

    #[test]
    fn test_retry_delay_respects_min() {
        let policy = RetryPolicy {
            max_attempts: 3,
            min_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
        };
        assert_eq!(policy.delay(1), Duration::from_secs(5));
        assert_eq!(policy.delay(3), Duration::from_secs(8));
        assert_eq!(policy.delay(10), Duration::from_secs(60));
    }
}

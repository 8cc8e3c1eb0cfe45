//! Worker metrics recorded through the `metrics` facade.

use metrics::{counter, histogram};
use std::time::Duration;

/// Metrics for a worker loop.
#[derive(Clone)]
pub struct WorkerMetrics {
    stream_name: String,
    processor_name: String,
}

impl WorkerMetrics {
    /// Create new metrics.
    pub fn new(stream_name: &str, processor_name: &str) -> Self {
        Self {
            stream_name: stream_name.to_string(),
            processor_name: processor_name.to_string(),
        }
    }

    /// Record a job received.
    pub fn job_received(&self) {
        counter!(
            "jobstream_jobs_received_total",
            "stream" => self.stream_name.clone(),
            "processor" => self.processor_name.clone()
        )
        .increment(1);
    }

    /// Record a job processed and acknowledged.
    pub fn job_processed(&self, duration: Duration) {
        counter!(
            "jobstream_jobs_processed_total",
            "stream" => self.stream_name.clone(),
            "processor" => self.processor_name.clone()
        )
        .increment(1);

        histogram!(
            "jobstream_job_duration_seconds",
            "stream" => self.stream_name.clone(),
            "processor" => self.processor_name.clone()
        )
        .record(duration.as_secs_f64());
    }

    /// Record a job left unacknowledged after a processing failure.
    pub fn job_failed(&self) {
        counter!(
            "jobstream_jobs_failed_total",
            "stream" => self.stream_name.clone(),
            "processor" => self.processor_name.clone()
        )
        .increment(1);
    }

    /// Record a worker session rebuild after a lost connection.
    pub fn session_rebuilt(&self) {
        counter!(
            "jobstream_reconnects_total",
            "stream" => self.stream_name.clone(),
            "processor" => self.processor_name.clone()
        )
        .increment(1);
    }
}

//! Job trait for background job processing.

use serde::{Serialize, de::DeserializeOwned};

/// A job that can be consumed from a stream and processed by a worker.
///
/// Implementations are plain serde types; the wire format is JSON. Delivery
/// accounting (redelivery count, sequence) is broker-side metadata and is
/// not part of the payload.
///
/// # Example
///
/// ```rust
/// use jobstream::Job;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct SummarizationJob {
///     extraction_id: String,
/// }
///
/// impl Job for SummarizationJob {
///     fn job_id(&self) -> String {
///         self.extraction_id.clone()
///     }
/// }
/// ```
pub trait Job: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// Get the unique job ID.
    ///
    /// This should be a stable identifier that doesn't change across
    /// redeliveries; it is used in logs and metrics.
    fn job_id(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Serialize, Deserialize)]
    struct TestJob {
        id: String,
    }

    impl Job for TestJob {
        fn job_id(&self) -> String {
            self.id.clone()
        }
    }

    #[test]
    fn test_job_id_is_stable() {
        let job = TestJob {
            id: "job-1".to_string(),
        };
        assert_eq!(job.job_id(), "job-1");
        assert_eq!(job.clone().job_id(), "job-1");
    }
}

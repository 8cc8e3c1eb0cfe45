//! Processor trait for job execution.

use crate::error::ProcessingError;
use crate::job::Job;
use async_trait::async_trait;

/// Job processor trait.
///
/// Implement this trait to define how jobs are processed. The worker invokes
/// `process` exactly once per delivery and acknowledges the message only
/// after it returns `Ok`; on `Err` the message is left unacknowledged and
/// the broker redelivers it after the ack wait, up to the delivery limit.
#[async_trait]
pub trait Processor<J: Job>: Send + Sync {
    /// Process a job.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Job processed and persisted; the worker acknowledges
    /// * `Err(ProcessingError)` - Processing failed; no acknowledgement
    async fn process(&self, job: &J) -> Result<(), ProcessingError>;

    /// Get the processor name.
    ///
    /// Used for logging and metrics labels.
    fn name(&self) -> &'static str;
}

/// A no-op processor for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpProcessor;

#[async_trait]
impl<J: Job> Processor<J> for NoOpProcessor {
    async fn process(&self, _job: &J) -> Result<(), ProcessingError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop_processor"
    }
}

/// A processor that always fails (for testing).
#[derive(Debug, Clone)]
pub struct FailingProcessor {
    error_message: String,
}

impl FailingProcessor {
    /// Create a processor that fails every delivery with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
        }
    }
}

#[async_trait]
impl<J: Job> Processor<J> for FailingProcessor {
    async fn process(&self, _job: &J) -> Result<(), ProcessingError> {
        Err(ProcessingError::new(&self.error_message))
    }

    fn name(&self) -> &'static str {
        "failing_processor"
    }
}

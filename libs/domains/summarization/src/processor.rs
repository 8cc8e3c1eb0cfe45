//! Summarization processor for stream workers.
//!
//! Bridges `SummarizationJob` deliveries to the `SummaryPipeline` boundary.

use crate::job::SummarizationJob;
use crate::pipeline::SummaryPipeline;
use async_trait::async_trait;
use jobstream::{ProcessingError, Processor};
use std::sync::Arc;
use tracing::info;

/// Processor that submits summarization jobs to a pipeline.
///
/// The worker acknowledges a delivery only after the pipeline reports
/// success; a pipeline failure leaves the message unacknowledged for the
/// broker to redeliver.
pub struct SummarizationProcessor<P: SummaryPipeline> {
    pipeline: Arc<P>,
}

impl<P: SummaryPipeline + 'static> SummarizationProcessor<P> {
    /// Create a new processor over the given pipeline.
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Create a processor sharing an existing pipeline handle.
    pub fn with_arc(pipeline: Arc<P>) -> Self {
        Self { pipeline }
    }

    /// Get a reference to the pipeline.
    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }
}

#[async_trait]
impl<P: SummaryPipeline + 'static> Processor<SummarizationJob> for SummarizationProcessor<P> {
    async fn process(&self, job: &SummarizationJob) -> Result<(), ProcessingError> {
        info!(
            extraction_id = %job.extraction_id,
            pipeline = self.pipeline.name(),
            "Processing summarization job"
        );

        self.pipeline
            .summarize(&job.extraction_id)
            .await
            .map_err(|e| ProcessingError::with_source("summary pipeline call failed", e))?;

        info!(
            extraction_id = %job.extraction_id,
            "Summary pipeline accepted the decision"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "summarization_processor"
    }
}

impl<P: SummaryPipeline> Clone for SummarizationProcessor<P> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::pipeline::MockSummaryPipeline;

    #[tokio::test]
    async fn test_successful_pipeline_call_returns_ok() {
        let mut mock = MockSummaryPipeline::new();
        mock.expect_name().return_const("mock_pipeline");
        mock.expect_summarize()
            .with(mockall::predicate::eq("abc123"))
            .times(1)
            .returning(|_| Ok(()));

        let processor = SummarizationProcessor::new(mock);
        let job = SummarizationJob::new("abc123");

        assert!(processor.process(&job).await.is_ok());
    }

    #[tokio::test]
    async fn test_pipeline_failure_propagates() {
        let mut mock = MockSummaryPipeline::new();
        mock.expect_name().return_const("mock_pipeline");
        mock.expect_summarize().returning(|_| {
            Err(PipelineError::Rejected {
                status: 400,
                detail: "unknown extraction".to_string(),
            })
        });

        let processor = SummarizationProcessor::new(mock);
        let job = SummarizationJob::new("missing");

        let error = processor.process(&job).await.unwrap_err();
        assert_eq!(error.to_string(), "summary pipeline call failed");
        assert!(std::error::Error::source(&error).is_some());
    }
}

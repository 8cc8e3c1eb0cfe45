//! Logging summary pipeline for development.

use super::SummaryPipeline;
use crate::error::PipelineResult;
use async_trait::async_trait;
use tracing::info;

/// Pipeline sink that only logs submissions.
///
/// Stands in for the summary API in development so the worker loop can run
/// without it.
#[derive(Debug, Clone, Default)]
pub struct LoggingPipeline;

impl LoggingPipeline {
    /// Create a new logging pipeline.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SummaryPipeline for LoggingPipeline {
    async fn summarize(&self, extraction_id: &str) -> PipelineResult<()> {
        info!(
            extraction_id = %extraction_id,
            "Logging pipeline received a summary request"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "logging_pipeline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accepts_every_submission() {
        let pipeline = LoggingPipeline::new();
        assert!(pipeline.summarize("abc123").await.is_ok());
        assert_eq!(pipeline.name(), "logging_pipeline");
    }
}

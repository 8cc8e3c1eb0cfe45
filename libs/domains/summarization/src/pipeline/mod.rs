//! Summary pipeline adapters.
//!
//! This module contains the `SummaryPipeline` trait and the adapters that
//! carry extraction ids across the pipeline boundary.

mod http;
mod logging;

pub use http::{HttpPipeline, HttpPipelineConfig};
pub use logging::LoggingPipeline;

use crate::error::PipelineResult;
use async_trait::async_trait;

/// Trait for the summary pipeline boundary.
///
/// Implementations hand an extraction id to whatever produces and persists
/// the summary. The call returns only once the result is durable; the
/// worker's acknowledgement hangs on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummaryPipeline: Send + Sync {
    /// Summarize the decision behind the given extraction id.
    async fn summarize(&self, extraction_id: &str) -> PipelineResult<()>;

    /// Get the adapter name for logging.
    fn name(&self) -> &'static str;
}

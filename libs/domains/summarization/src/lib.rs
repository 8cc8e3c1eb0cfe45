//! Summarization Domain
//!
//! Court decision summarization jobs: the wire payload, the stream topology
//! and the processor bridging deliveries to the summary pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │    API / CLI     │  ← Submits extraction ids
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │  NATS JetStream  │  ← SUPREME_COURT_SUMMARIZATION_EVENT stream
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │   Worker pool    │  ← SummarizationProcessor
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ SummaryPipeline  │  ← Summary API over HTTP, or a logging sink
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_summarization::{
//!     HttpPipeline, SummarizationProcessor, SummarizationStream,
//! };
//! use jobstream::{BrokerSettings, WorkerConfig, WorkerPool};
//!
//! let config = WorkerConfig::from_stream::<SummarizationStream>();
//! let processor = SummarizationProcessor::new(HttpPipeline::from_env()?);
//! let pool = WorkerPool::start(settings, config, processor, 3).await?;
//! ```

pub mod error;
pub mod job;
pub mod pipeline;
pub mod processor;
pub mod streams;

// Re-export commonly used types
pub use error::{PipelineError, PipelineResult};
pub use job::SummarizationJob;
pub use pipeline::{HttpPipeline, HttpPipelineConfig, LoggingPipeline, SummaryPipeline};
pub use processor::SummarizationProcessor;
pub use streams::SummarizationStream;

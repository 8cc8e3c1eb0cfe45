//! NATS JetStream job consumption framework.
//!
//! This library drives durable background job processing over NATS
//! JetStream: it provisions the stream, binds a shared durable pull
//! consumer, and fans deliveries out to a pool of worker loops that heal
//! their own sessions when the broker connection drops.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────────┐     ┌──────────────┐
//! │  Submitter   │────▶│   NATS JetStream    │────▶│  WorkerPool  │
//! │(JobPublisher)│     │  (Durable Stream)   │     │ (WorkerLoop) │
//! └──────────────┘     └─────────────────────┘     └──────────────┘
//!                                                         │
//!                                                         ▼
//!                                                  ┌──────────────┐
//!                                                  │  Processor   │
//!                                                  │ (Your Logic) │
//!                                                  └──────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Pull Consumers**: explicit acks, shared durable, broker-side
//!   load balancing across workers
//! - **At-Least-Once**: messages are acknowledged only after the
//!   processor succeeds; failures redeliver up to the delivery limit
//! - **Self-Healing**: each worker observes connection state before
//!   fetching and rebuilds its session (connect, provision, attach)
//! - **Idempotent Provisioning**: applying the same stream spec twice
//!   changes nothing and never aborts boot
//! - **Bounded Submission Retry**: publishes back off exponentially
//!   within a fixed budget
//! - **Graceful Shutdown**: cooperative drain with a bounded grace period
//!
//! # Example
//!
//! ```rust,ignore
//! use jobstream::{StreamDef, WorkerConfig, WorkerPool, BrokerSettings};
//!
//! // Define your stream
//! struct SummarizationStream;
//! impl StreamDef for SummarizationStream {
//!     const STREAM_NAME: &'static str = "SUMMARIZATION_EVENT";
//!     const SUBJECTS: &'static str = "SUMMARIZATION_EVENT.>";
//!     const SUBJECT: &'static str = "SUMMARIZATION_EVENT.summarize";
//!     const DURABLE_NAME: &'static str = "SUMMARIZATION";
//! }
//!
//! // Start the pool
//! let pool = WorkerPool::start::<SummarizationJob, _>(
//!     BrokerSettings::new(nats_url),
//!     WorkerConfig::from_stream::<SummarizationStream>(),
//!     processor,
//!     3,
//! ).await?;
//!
//! // Drain on shutdown
//! jobstream::shutdown_signal().await;
//! pool.shutdown(Duration::from_secs(2)).await;
//! ```

mod config;
mod connection;
mod consumer;
mod error;
mod job;
mod metrics;
mod processor;
mod producer;
mod provision;
mod shutdown;
mod worker;

pub use config::{BrokerSettings, StreamDef, WorkerConfig};
pub use connection::{BrokerConnection, ConnectionState};
pub use consumer::{Delivery, JobConsumer};
pub use error::{JobStreamError, ProcessingError};
pub use job::Job;
pub use metrics::WorkerMetrics;
pub use processor::{FailingProcessor, NoOpProcessor, Processor};
pub use producer::{JobPublisher, RetryPolicy};
pub use provision::{ProvisionOutcome, StreamSpec, ensure_stream};
pub use shutdown::shutdown_signal;
pub use worker::{WorkerLoop, WorkerPool};

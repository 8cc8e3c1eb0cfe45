//! Summarizer Service
//!
//! Consumes court decision summarization jobs from NATS JetStream and
//! drives each one through the summary pipeline. Also serves the single
//! submission route that queues new jobs.
//!
//! ## Architecture
//!
//! ```text
//! POST /court-decision/summarize
//!   ↓ (JobPublisher, bounded retry)
//! NATS JetStream (SUPREME_COURT_SUMMARIZATION_EVENT stream)
//!   ↓ (durable pull consumer: SUPREME_COURT_SUMMARIZATION)
//! WorkerPool (N worker loops, shared durable)
//!   ↓
//! SummarizationProcessor
//!   ↓
//! SummaryPipeline (summary API for prod, logging sink for dev)
//! ```
//!
//! ## Features
//!
//! - Durable pull consumption with explicit acks
//! - Per-loop session rebuild after broker disconnects
//! - Graceful shutdown with a bounded drain
//! - Submission route with a bounded publish retry budget

use core_config::{Environment, app_info};
use domain_summarization::{
    HttpPipeline, LoggingPipeline, SummarizationProcessor, SummarizationStream, SummaryPipeline,
};
use eyre::{Result, WrapErr};
use jobstream::{JobPublisher, WorkerConfig, WorkerPool, shutdown_signal};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

pub mod config;
pub mod routes;

use config::Config;

/// Run the summarizer service
///
/// This is the main entry point. It:
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Connects to NATS, provisions the stream and attaches the durable
/// 3. Selects the pipeline adapter (summary API for prod, logging for dev)
/// 4. Serves the submission route until SIGINT/SIGTERM, then drains
///
/// # Errors
///
/// Returns an error if:
/// - Required configuration is missing or invalid
/// - The NATS connection cannot be established at boot
/// - The submission server fails to bind
pub async fn run() -> Result<()> {
    // Colored error reports before anything can fail
    core_config::tracing::install_color_eyre();

    let config = Config::from_env()?;

    // Initialize tracing (env-aware: JSON for prod, pretty for dev)
    core_config::tracing::init_tracing(&config.environment);

    let app_info = app_info!();
    info!(
        name = %app_info.name,
        version = %app_info.version,
        "Starting summarizer service"
    );
    info!("Environment: {:?}", config.environment);

    let worker_config = WorkerConfig::from_stream::<SummarizationStream>();
    info!(
        stream = %worker_config.stream_name,
        durable = %worker_config.durable_name,
        filter = %worker_config.filter_subject,
        workers = config.worker_instances,
        "Worker configuration loaded"
    );

    // Select the pipeline adapter based on environment
    match config.environment {
        Environment::Production => {
            info!("Using the HTTP summary pipeline");
            let pipeline = HttpPipeline::from_env().map_err(|e| {
                eyre::eyre!(
                    "Summary pipeline configuration error: {}. Ensure SUMMARY_API_URL is set.",
                    e
                )
            })?;
            serve(config, worker_config, SummarizationProcessor::new(pipeline)).await
        }
        Environment::Development => {
            info!("Using the logging pipeline for development");
            let processor = SummarizationProcessor::new(LoggingPipeline::new());
            serve(config, worker_config, processor).await
        }
    }
}

/// Start the worker pool, serve the submission route until shutdown, then
/// drain the pool within the grace period.
async fn serve<P: SummaryPipeline + 'static>(
    config: Config,
    worker_config: WorkerConfig,
    processor: SummarizationProcessor<P>,
) -> Result<()> {
    let pool = WorkerPool::start(
        config.broker.clone(),
        worker_config,
        processor,
        config.worker_instances,
    )
    .await
    .wrap_err("Failed to start the worker pool")?;

    // The submission route publishes over the pool's connection
    let publisher = JobPublisher::from_stream::<SummarizationStream>(pool.jetstream());
    let app = routes::router(routes::AppState { publisher });

    // Set up a shutdown signal
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let addr = config.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind submission server to {}", addr))?;
    info!(addr = %addr, "Submission server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // A closed channel counts as shutdown too
            let _ = shutdown_rx.wait_for(|stop| *stop).await;
        })
        .await
        .wrap_err("Submission server failed")?;

    pool.shutdown(config.shutdown_grace).await;

    info!("Summarizer service stopped");
    Ok(())
}

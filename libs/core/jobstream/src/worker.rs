//! Worker loop and pool for pull-based job consumption.

use crate::config::{BrokerSettings, WorkerConfig};
use crate::connection::BrokerConnection;
use crate::consumer::{Delivery, JobConsumer};
use crate::error::JobStreamError;
use crate::job::Job;
use crate::metrics::WorkerMetrics;
use crate::processor::Processor;
use crate::provision::{ProvisionOutcome, ensure_stream};
use async_nats::jetstream::Context;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// A single pull worker over a durable consumer.
///
/// The loop cycles fetch, process, acknowledge. Before each fetch it reads
/// the connection state; a dead session is rebuilt in place (reconnect,
/// re-provision the stream, re-attach the durable) before fetching resumes.
/// Transient faults never terminate the loop; only cancellation does.
pub struct WorkerLoop<J: Job, P: Processor<J>> {
    worker_id: usize,
    settings: BrokerSettings,
    config: WorkerConfig,
    processor: Arc<P>,
    connection: BrokerConnection,
    consumer: JobConsumer,
    metrics: WorkerMetrics,
    _marker: PhantomData<J>,
}

impl<J: Job, P: Processor<J>> WorkerLoop<J, P> {
    /// Create a worker over an established session.
    pub fn new(
        worker_id: usize,
        settings: BrokerSettings,
        config: WorkerConfig,
        processor: Arc<P>,
        connection: BrokerConnection,
        consumer: JobConsumer,
    ) -> Self {
        let metrics = WorkerMetrics::new(&config.stream_name, processor.name());
        Self {
            worker_id,
            settings,
            config,
            processor,
            connection,
            consumer,
            metrics,
            _marker: PhantomData,
        }
    }

    /// Run until cancelled.
    ///
    /// Cancellation is honored between iterations and while waiting, never
    /// in the middle of a processing call: a delivery being processed runs
    /// to its acknowledgement or failure before the loop exits.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(
            worker = self.worker_id,
            stream = %self.config.stream_name,
            durable = %self.config.durable_name,
            "Starting worker"
        );

        loop {
            // A closed channel means the pool is gone; stop as well
            if *shutdown_rx.borrow() || shutdown_rx.has_changed().is_err() {
                info!(
                    worker = self.worker_id,
                    "Shutdown signal received, stopping worker"
                );
                break;
            }

            if !self.connection.is_connected() {
                warn!(
                    worker = self.worker_id,
                    "Broker connection lost, rebuilding session"
                );
                match self.rebuild_session().await {
                    Ok(()) => {
                        self.metrics.session_rebuilt();
                        info!(worker = self.worker_id, "Session rebuilt");
                    }
                    Err(e) => {
                        warn!(worker = self.worker_id, error = %e, "Session rebuild failed");
                        self.pause(&mut shutdown_rx).await;
                        continue;
                    }
                }
            }

            // Dropping an in-flight fetch on shutdown is harmless; no
            // delivery is being processed yet
            let fetched = tokio::select! {
                _ = shutdown_rx.wait_for(|stop| *stop) => continue,
                fetched = self.consumer.fetch::<J>() => fetched,
            };

            match fetched {
                Ok(deliveries) if deliveries.is_empty() => {
                    self.pause(&mut shutdown_rx).await;
                }
                Ok(deliveries) => {
                    if self.process_deliveries(deliveries).await {
                        // A failed job stays unacknowledged; slow down so a
                        // persistently failing job becomes a retry cadence
                        // instead of a tight loop
                        self.pause(&mut shutdown_rx).await;
                    }
                }
                Err(e) => {
                    warn!(worker = self.worker_id, error = %e, "Fetch failed");
                    self.pause(&mut shutdown_rx).await;
                }
            }
        }

        info!(worker = self.worker_id, "Worker stopped");
    }

    /// Process a batch, acknowledging each success. Returns whether any
    /// delivery failed.
    async fn process_deliveries(&self, deliveries: Vec<Delivery<J>>) -> bool {
        let mut had_failure = false;

        for delivery in deliveries {
            self.metrics.job_received();

            let job_id = delivery.job_id();

            if delivery.is_redelivery() {
                debug!(
                    worker = self.worker_id,
                    job_id = %job_id,
                    sequence = delivery.stream_sequence,
                    delivery_count = delivery.delivery_count,
                    "Processing redelivered message"
                );
            }

            let start = Instant::now();
            let result = self.processor.process(&delivery.job).await;
            let duration = start.elapsed();

            match result {
                Ok(()) => {
                    // Acknowledge only now that the processor has
                    // persisted its result
                    match delivery.ack().await {
                        Ok(()) => {
                            self.metrics.job_processed(duration);
                            debug!(
                                worker = self.worker_id,
                                job_id = %job_id,
                                duration_ms = duration.as_millis() as u64,
                                "Job processed successfully"
                            );
                        }
                        Err(e) => {
                            warn!(
                                worker = self.worker_id,
                                job_id = %job_id,
                                error = %e,
                                "Ack failed, message will be redelivered"
                            );
                            had_failure = true;
                        }
                    }
                }
                Err(e) => {
                    self.metrics.job_failed();
                    warn!(
                        worker = self.worker_id,
                        job_id = %job_id,
                        error = %e,
                        "Job processing failed, leaving unacknowledged"
                    );
                    had_failure = true;
                }
            }
        }

        had_failure
    }

    /// Rebuild the connection, re-provision the stream, re-attach the
    /// durable consumer.
    async fn rebuild_session(&mut self) -> Result<(), JobStreamError> {
        let connection = BrokerConnection::connect(&self.settings).await?;

        let outcome = ensure_stream(connection.jetstream(), &self.config.stream_spec()).await;
        if let ProvisionOutcome::Failed(reason) = &outcome {
            warn!(
                worker = self.worker_id,
                reason = %reason,
                "Stream provisioning failed during session rebuild"
            );
        }

        self.consumer = JobConsumer::attach(connection.jetstream(), &self.config).await?;
        self.connection = connection;
        Ok(())
    }

    /// Sleep the idle backoff, waking early if shutdown is flagged.
    async fn pause(&self, shutdown_rx: &mut watch::Receiver<bool>) {
        let _ = tokio::time::timeout(
            self.config.idle_backoff,
            shutdown_rx.wait_for(|stop| *stop),
        )
        .await;
    }
}

/// A fixed pool of worker loops sharing one durable consumer.
///
/// The broker's pull semantics load-balance pending messages across the
/// loops; no two receive the same undelivered message.
pub struct WorkerPool {
    shutdown_tx: watch::Sender<bool>,
    tasks: JoinSet<()>,
    connection: BrokerConnection,
}

impl WorkerPool {
    /// Connect, provision the stream, and spawn `workers` loops.
    pub async fn start<J, P>(
        settings: BrokerSettings,
        config: WorkerConfig,
        processor: P,
        workers: usize,
    ) -> Result<Self, JobStreamError>
    where
        J: Job,
        P: Processor<J> + 'static,
    {
        let connection = BrokerConnection::connect(&settings).await?;

        let outcome = ensure_stream(connection.jetstream(), &config.stream_spec()).await;
        info!(stream = %config.stream_name, outcome = ?outcome, "Stream provisioned");

        let processor = Arc::new(processor);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut tasks = JoinSet::new();

        for worker_id in 0..workers {
            let consumer = JobConsumer::attach(connection.jetstream(), &config).await?;
            let worker = WorkerLoop::new(
                worker_id,
                settings.clone(),
                config.clone(),
                processor.clone(),
                connection.clone(),
                consumer,
            );
            tasks.spawn(worker.run(shutdown_rx.clone()));
        }

        info!(
            workers = workers,
            stream = %config.stream_name,
            durable = %config.durable_name,
            "Worker pool started"
        );

        Ok(Self {
            shutdown_tx,
            tasks,
            connection,
        })
    }

    /// Number of worker tasks still running.
    pub fn worker_count(&self) -> usize {
        self.tasks.len()
    }

    /// JetStream context over the pool's connection.
    ///
    /// Lets publishers share the connection instead of dialing their own.
    pub fn jetstream(&self) -> Context {
        self.connection.jetstream().clone()
    }

    /// Drain the pool: flag cancellation, wait up to `grace` for loops to
    /// finish their current iteration, abort stragglers, close the
    /// connection.
    pub async fn shutdown(mut self, grace: Duration) {
        info!(workers = self.tasks.len(), "Draining worker pool");
        let _ = self.shutdown_tx.send(true);

        let drain = async {
            while self.tasks.join_next().await.is_some() {}
        };
        if tokio::time::timeout(grace, drain).await.is_err() {
            warn!(
                remaining = self.tasks.len(),
                "Grace period expired, aborting remaining workers"
            );
            self.tasks.shutdown().await;
        }

        self.connection.close().await;
        info!("Worker pool stopped");
    }
}

//! Idempotent stream provisioning.

use crate::config::StreamDef;
use async_nats::jetstream::Context;
use async_nats::jetstream::stream::Config as StreamConfig;
use tracing::{debug, info, warn};

/// Desired stream topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSpec {
    /// Stream name
    pub name: String,
    /// Subjects bound to the stream
    pub subjects: Vec<String>,
}

impl StreamSpec {
    /// Create a spec binding one subject pattern to a stream.
    pub fn new(name: impl Into<String>, subjects: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subjects: vec![subjects.into()],
        }
    }

    /// Create from a StreamDef trait.
    pub fn from_stream<S: StreamDef>() -> Self {
        Self::new(S::STREAM_NAME, S::SUBJECTS)
    }
}

/// Result of a provisioning attempt.
///
/// Provisioning never aborts boot: failures are logged and reported here so
/// callers (and tests) can observe what happened without the call erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Stream did not exist and was created
    Created,
    /// Existing stream updated in place
    Updated,
    /// Lost a creation race to a concurrent boot; the stream is there
    AlreadyExists,
    /// Provisioning failed; the broker keeps whatever state it had
    Failed(String),
}

impl ProvisionOutcome {
    /// Whether the desired topology is in place after the attempt.
    pub fn is_applied(&self) -> bool {
        !matches!(self, ProvisionOutcome::Failed(_))
    }
}

/// Ensure the stream exists with the spec's subjects.
///
/// Applying the same spec twice produces no observable change. The update
/// path runs first so subject changes land on an existing stream; creation
/// is the fallback for a missing stream. A creation race against a
/// concurrent boot resolves to [`ProvisionOutcome::AlreadyExists`].
pub async fn ensure_stream(jetstream: &Context, spec: &StreamSpec) -> ProvisionOutcome {
    let config = StreamConfig {
        name: spec.name.clone(),
        subjects: spec.subjects.clone(),
        ..Default::default()
    };

    match jetstream.update_stream(&config).await {
        Ok(_) => {
            info!(stream = %spec.name, "Stream updated");
            ProvisionOutcome::Updated
        }
        Err(update_err) => {
            if jetstream.get_stream(&spec.name).await.is_ok() {
                // Exists but refused the update; keep the broker's state
                warn!(
                    stream = %spec.name,
                    error = %update_err,
                    "Stream update failed, keeping existing configuration"
                );
                return ProvisionOutcome::Failed(update_err.to_string());
            }

            match jetstream.create_stream(config).await {
                Ok(_) => {
                    info!(
                        stream = %spec.name,
                        subjects = ?spec.subjects,
                        "Stream created"
                    );
                    ProvisionOutcome::Created
                }
                Err(create_err) => {
                    if jetstream.get_stream(&spec.name).await.is_ok() {
                        debug!(stream = %spec.name, "Stream created by a concurrent boot");
                        ProvisionOutcome::AlreadyExists
                    } else {
                        warn!(
                            stream = %spec.name,
                            error = %create_err,
                            "Stream provisioning failed"
                        );
                        ProvisionOutcome::Failed(create_err.to_string())
                    }
                }
            }
        }
    }
}

//! HTTP submission boundary.
//!
//! One route: `POST /court-decision/summarize` queues a summarization job
//! on the stream and reports whether the broker accepted it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use domain_summarization::SummarizationJob;
use jobstream::JobPublisher;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

/// Shared state for the submission route.
#[derive(Clone)]
pub struct AppState {
    pub publisher: JobPublisher,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/court-decision/summarize", post(submit_summarization))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SummarizeRequest {
    extraction_id: String,
}

async fn submit_summarization(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> (StatusCode, Json<Value>) {
    let job = SummarizationJob::new(request.extraction_id);

    match state.publisher.publish_with_retry(&job).await {
        Ok(sequence) => {
            info!(
                extraction_id = %job.extraction_id,
                sequence = sequence,
                "Summarization job queued"
            );
            (StatusCode::OK, Json(json!({"data": "success"})))
        }
        Err(e) => {
            error!(
                extraction_id = %job.extraction_id,
                error = %e,
                "Failed to queue summarization job"
            );
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "failed to queue summarization job"})),
            )
        }
    }
}

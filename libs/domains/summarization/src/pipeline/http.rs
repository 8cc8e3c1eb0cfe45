//! HTTP summary pipeline adapter.

use super::SummaryPipeline;
use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Summary API configuration.
#[derive(Debug, Clone)]
pub struct HttpPipelineConfig {
    /// Base URL of the summary API.
    pub base_url: String,
    /// Total request timeout. Summaries are slow; keep this under the
    /// consumer's ack wait.
    pub timeout: Duration,
}

impl HttpPipelineConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> PipelineResult<Self> {
        let base_url = std::env::var("SUMMARY_API_URL")
            .map_err(|_| PipelineError::Config("SUMMARY_API_URL not set".to_string()))?;
        let timeout = std::env::var("SUMMARY_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);

        Ok(Self::new(base_url).with_timeout(timeout))
    }
}

/// Summary pipeline backed by the summary API.
pub struct HttpPipeline {
    config: HttpPipelineConfig,
    client: Client,
}

impl HttpPipeline {
    /// Create a new HTTP pipeline adapter.
    pub fn new(config: HttpPipelineConfig) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::Internal(format!("HTTP client initialization: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create an adapter from environment variables.
    pub fn from_env() -> PipelineResult<Self> {
        Self::new(HttpPipelineConfig::from_env()?)
    }
}

// Summary API request/response structures

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    extraction_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    data: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: String,
}

#[async_trait]
impl SummaryPipeline for HttpPipeline {
    async fn summarize(&self, extraction_id: &str) -> PipelineResult<()> {
        debug!(
            extraction_id = %extraction_id,
            url = %self.config.base_url,
            "Submitting decision to the summary API"
        );

        let response = self
            .client
            .post(format!(
                "{}/court-decision/summarize",
                self.config.base_url
            ))
            .json(&SummarizeRequest { extraction_id })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let data = serde_json::from_str::<SummarizeResponse>(&body)
                .map(|r| r.data)
                .unwrap_or(body);

            info!(
                extraction_id = %extraction_id,
                data = %data,
                "Summary API accepted the decision"
            );
            Ok(())
        } else {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                extraction_id = %extraction_id,
                status = %status,
                error = %error_body,
                "Summary API refused the submission"
            );

            // The API reports failures as {"detail": "..."}
            let detail = if let Ok(body) = serde_json::from_str::<ApiErrorBody>(&error_body) {
                body.detail
            } else {
                error_body
            };

            Err(PipelineError::Rejected {
                status: status.as_u16(),
                detail,
            })
        }
    }

    fn name(&self) -> &'static str {
        "http_pipeline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<String>>>;

    #[derive(Debug, Deserialize)]
    struct CapturedRequest {
        extraction_id: String,
    }

    async fn accept(
        State(seen): State<Seen>,
        Json(req): Json<CapturedRequest>,
    ) -> Json<serde_json::Value> {
        seen.lock().unwrap().push(req.extraction_id);
        Json(serde_json::json!({"data": "success"}))
    }

    async fn refuse() -> (StatusCode, Json<serde_json::Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"detail": "unknown extraction"})),
        )
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_submits_the_extraction_id() {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route("/court-decision/summarize", post(accept))
            .with_state(seen.clone());
        let base_url = serve(app).await;

        let pipeline = HttpPipeline::new(HttpPipelineConfig::new(base_url)).unwrap();
        pipeline.summarize("abc123").await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["abc123".to_string()]);
    }

    #[tokio::test]
    async fn test_maps_refusals_to_rejected() {
        let app = Router::new().route("/court-decision/summarize", post(refuse));
        let base_url = serve(app).await;

        let pipeline = HttpPipeline::new(HttpPipelineConfig::new(base_url)).unwrap();
        let err = pipeline.summarize("abc123").await.unwrap_err();

        match err {
            PipelineError::Rejected { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "unknown extraction");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = HttpPipelineConfig::new("http://localhost:8000/");
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_config_from_env_requires_the_url() {
        temp_env::with_vars(
            [
                ("SUMMARY_API_URL", None::<&str>),
                ("SUMMARY_API_TIMEOUT_SECS", None),
            ],
            || {
                let result = HttpPipelineConfig::from_env();
                assert!(matches!(result, Err(PipelineError::Config(_))));
            },
        );
    }

    #[test]
    fn test_config_from_env_reads_url_and_timeout() {
        temp_env::with_vars(
            [
                ("SUMMARY_API_URL", Some("http://summaries:8000")),
                ("SUMMARY_API_TIMEOUT_SECS", Some("90")),
            ],
            || {
                let config = HttpPipelineConfig::from_env().unwrap();
                assert_eq!(config.base_url, "http://summaries:8000");
                assert_eq!(config.timeout, Duration::from_secs(90));
            },
        );
    }
}

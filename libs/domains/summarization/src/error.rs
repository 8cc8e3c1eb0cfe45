//! Error types for the summarization domain.

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised at the summary pipeline boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The summary API refused the submission.
    #[error("Summary API rejected the submission ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// Transport failure reaching the summary API.
    #[error("Summary API error: {0}")]
    Api(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        PipelineError::Api(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_carries_status_and_detail() {
        let err = PipelineError::Rejected {
            status: 400,
            detail: "unknown extraction".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("400"));
        assert!(rendered.contains("unknown extraction"));
    }
}

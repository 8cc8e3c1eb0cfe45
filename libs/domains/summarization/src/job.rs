//! Job payload for summarization work.

use jobstream::Job;
use serde::{Deserialize, Serialize};

/// A request to summarize one extracted court decision.
///
/// The wire format is the bare extraction id object,
/// `{"extraction_id":"abc123"}`. Consumers ignore any extra fields a
/// future publisher might add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizationJob {
    /// Identifier of the extracted decision to summarize.
    pub extraction_id: String,
}

impl SummarizationJob {
    /// Create a job for the given extraction id.
    pub fn new(extraction_id: impl Into<String>) -> Self {
        Self {
            extraction_id: extraction_id.into(),
        }
    }
}

impl Job for SummarizationJob {
    fn job_id(&self) -> String {
        self.extraction_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let job = SummarizationJob::new("abc123");
        let json = serde_json::to_string(&job).unwrap();
        assert_eq!(json, r#"{"extraction_id":"abc123"}"#);
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let job: SummarizationJob =
            serde_json::from_str(r#"{"extraction_id":"abc123","trace":"t-1"}"#).unwrap();
        assert_eq!(job.extraction_id, "abc123");
    }

    #[test]
    fn test_decode_requires_extraction_id() {
        let result = serde_json::from_str::<SummarizationJob>(r#"{"id":"abc123"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_job_id_is_the_extraction_id() {
        assert_eq!(SummarizationJob::new("x-1").job_id(), "x-1");
    }
}

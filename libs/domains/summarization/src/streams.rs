//! Stream topology for the summarization domain.

use jobstream::StreamDef;

/// Court decision summarization stream.
///
/// Every summarizer instance shares the durable, so the broker
/// load-balances deliveries across them.
pub struct SummarizationStream;

impl StreamDef for SummarizationStream {
    /// Stream holding summarization events.
    const STREAM_NAME: &'static str = "SUPREME_COURT_SUMMARIZATION_EVENT";

    /// Every subject under the stream prefix.
    const SUBJECTS: &'static str = "SUPREME_COURT_SUMMARIZATION_EVENT.>";

    /// Subject summarization jobs are published to.
    const SUBJECT: &'static str = "SUPREME_COURT_SUMMARIZATION_EVENT.summarize";

    /// Durable shared by all summarizer instances.
    const DURABLE_NAME: &'static str = "SUPREME_COURT_SUMMARIZATION";

    /// Two delivery attempts per decision.
    const MAX_DELIVER: i64 = 2;

    /// An hour to finish a summary before redelivery.
    const ACK_WAIT_SECS: u64 = 3600;

    /// At most three decisions in flight across all workers.
    const MAX_ACK_PENDING: i64 = 3;
}

//! Summarizer Service
//!
//! Binary entry point for the JetStream-based summarization service.

#[tokio::main]
async fn main() {
    if let Err(e) = summarizer::run().await {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

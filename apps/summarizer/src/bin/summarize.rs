//! Summarize CLI
//!
//! Drives the summary pipeline once for a given extraction id, bypassing
//! the broker. Useful for manual reruns and smoke checks.

use clap::Parser;
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_summarization::{HttpPipeline, HttpPipelineConfig, SummaryPipeline};
use eyre::Result;
use tracing::info;

#[derive(Parser)]
#[command(name = "summarize")]
#[command(about = "Summarize one extracted court decision through the summary API")]
struct Cli {
    /// Extraction id of the decision to summarize
    extraction_id: String,

    /// Summary API base URL (defaults to SUMMARY_API_URL)
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();

    let pipeline = match cli.endpoint {
        Some(endpoint) => HttpPipeline::new(HttpPipelineConfig::new(endpoint))?,
        None => HttpPipeline::from_env()?,
    };

    info!(extraction_id = %cli.extraction_id, "Submitting decision to the summary API");
    pipeline.summarize(&cli.extraction_id).await?;

    println!("Summarized extraction {}", cli.extraction_id);
    Ok(())
}

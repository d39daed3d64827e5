mod analysis;
mod config;
mod console;
mod errors;
mod github;
mod llm_client;
mod operators;
mod pipeline;
mod posting;
mod report;
mod transport;

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::pipeline::Pipeline;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration first; logging setup reads the filter from it.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JD-Scanner v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = Pipeline::new(&config);
    match pipeline.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run aborted: {e}");
            eprintln!("\nError: {e}");
            eprintln!("Hint: {}", e.guidance());
            ExitCode::FAILURE
        }
    }
}

//! Binary crate for the `weather-dash` terminal dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - The input loop and text rendering (summary panel + line chart)

use clap::Parser;

mod app;
mod chart;
mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr and default to warnings so they don't interleave with the dashboard.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

//! Tracking Router CLI
//!
//! Command-line interface for inspecting provider routing decisions.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod output;

use cli::Cli;
use tracking_telemetry::{init_tracing, shutdown_tracing, TracingConfig};

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let tracing_config = TracingConfig::new("tracking-router")
        .with_verbosity(cli.verbose)
        .with_json(cli.json);
    let provider = init_tracing(&tracing_config)?;

    let result = cli.execute();
    shutdown_tracing(provider);
    result
}

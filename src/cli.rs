//! CLI argument definitions using clap.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracking_config::{ConfigLoader, RoutingConfig, ENV_CONFIG_PATH};

use crate::commands;

/// Tracking Router - pick and order shipment-tracking providers
#[derive(Parser, Debug)]
#[command(name = "tracking-router")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Routing configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = ENV_CONFIG_PATH, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze routing for a tracking number
    #[command(visible_alias = "route")]
    Analyze(commands::analyze::AnalyzeArgs),

    /// Detect the carrier of a tracking number
    Detect(commands::detect::DetectArgs),

    /// List registered providers
    Providers(commands::providers::ProvidersArgs),

    /// Validate a routing configuration file
    #[command(name = "validate-config")]
    ValidateConfig(commands::validate_config::ValidateConfigArgs),
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(ref args) => {
                commands::analyze::execute(args, &self.load_config()?, self.json)
            }
            Commands::Detect(ref args) => {
                commands::detect::execute(args, &self.load_config()?, self.json)
            }
            Commands::Providers(ref args) => commands::providers::execute(args, self.json),
            Commands::ValidateConfig(ref args) => {
                commands::validate_config::execute(args, self.json)
            }
        }
    }

    /// Load the routing configuration: defaults, then the config file, then
    /// environment overrides.
    fn load_config(&self) -> Result<RoutingConfig> {
        debug!(config = ?self.config, "Loading routing configuration");
        let mut loader = ConfigLoader::new();
        if let Some(path) = &self.config {
            loader = loader.with_file(path);
        }
        loader.load().context("Failed to load routing configuration")
    }
}

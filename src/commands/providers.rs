//! Providers command - list the provider catalog.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracking_core::TrackingType;
use tracking_routing::{ProviderProfile, ProviderRegistry};

use crate::output::{self, CommandResult, OutputFormat};

/// Arguments for the providers command.
#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// Only list providers supporting this tracking type
    #[arg(short = 't', long = "type")]
    pub tracking_type: Option<TrackingType>,
}

/// Provider row for table display.
#[derive(Debug, Serialize, Tabled)]
pub struct ProviderRow {
    /// Provider id
    #[tabled(rename = "Provider")]
    pub id: String,
    /// Display name
    #[tabled(rename = "Name")]
    pub name: String,
    /// Carrier, aggregator or specialist
    #[tabled(rename = "Kind")]
    pub kind: String,
    /// Cost per lookup in cents
    #[tabled(rename = "Cost (¢)")]
    pub cost_cents: u32,
    /// Base reliability
    #[tabled(rename = "Reliability")]
    pub reliability: String,
    /// Supported tracking types
    #[tabled(rename = "Types")]
    pub types: String,
}

impl From<&ProviderProfile> for ProviderRow {
    fn from(profile: &ProviderProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.display_name.clone(),
            kind: profile.kind.as_str().to_string(),
            cost_cents: profile.base_cost_cents,
            reliability: format!("{:.2}", profile.base_reliability),
            types: profile
                .supported_types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Rows for the standard registry, optionally filtered.
pub fn rows(tracking_type: Option<TrackingType>) -> Vec<ProviderRow> {
    let registry = ProviderRegistry::standard();
    match tracking_type {
        Some(t) => registry
            .providers_supporting(t)
            .into_iter()
            .map(ProviderRow::from)
            .collect(),
        None => registry.iter().map(ProviderRow::from).collect(),
    }
}

/// Execute the providers command.
pub fn execute(args: &ProvidersArgs, json: bool) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);
    let rows = rows(args.tracking_type);

    match format {
        OutputFormat::Json => CommandResult::success(rows).print(format),
        OutputFormat::Text => {
            output::section("Providers");
            output::table(&rows);
            Ok(())
        }
    }
}

//! Detect command - identify the carrier of a tracking number.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracking_config::RoutingConfig;
use tracking_core::{Carrier, CarrierMatch, MatchKind};
use tracking_routing::{pattern, PatternMatcher};

use crate::output::{self, CommandResult, OutputFormat};

/// Arguments for the detect command.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Tracking numbers to inspect
    #[arg(required = true)]
    pub tracking_numbers: Vec<String>,
}

/// Detection result for one tracking number.
#[derive(Debug, Serialize)]
pub struct Detection {
    /// Input as given
    pub input: String,
    /// Input after normalization
    pub normalized: String,
    /// Detected carrier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<Carrier>,
    /// How the carrier was recognized
    pub kind: MatchKind,
    /// Detection confidence
    pub confidence: f64,
    /// Whether the router would suggest the carrier
    pub suggested: bool,
}

impl Detection {
    fn new(input: &str, found: CarrierMatch, threshold: f64) -> Self {
        Self {
            input: input.to_string(),
            normalized: pattern::normalize(input),
            carrier: found.carrier,
            kind: found.kind,
            confidence: found.confidence,
            suggested: found.confident_carrier(threshold).is_some(),
        }
    }
}

/// Detect carriers for each argument.
pub fn detect_all(numbers: &[String], config: &RoutingConfig) -> Vec<Detection> {
    let matcher = PatternMatcher::new(config.pattern.clone());
    numbers
        .iter()
        .map(|n| Detection::new(n, matcher.detect_carrier(n), matcher.suggestion_threshold()))
        .collect()
}

/// Execute the detect command.
pub fn execute(args: &DetectArgs, config: &RoutingConfig, json: bool) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);
    let detections = detect_all(&args.tracking_numbers, config);

    if format == OutputFormat::Json {
        return CommandResult::success(detections).print(format);
    }

    for detection in &detections {
        output::section(&detection.input);
        output::key_value("Normalized", &detection.normalized);
        output::key_value(
            "Carrier",
            &detection
                .carrier
                .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
        );
        output::key_value("Match", &format!("{:?}", detection.kind).to_lowercase());
        output::key_value("Confidence", &output::format_confidence(detection.confidence));
        if !detection.suggested {
            output::warning("Confidence too low to suggest a carrier");
        }
    }
    Ok(())
}

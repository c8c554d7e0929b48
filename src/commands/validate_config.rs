//! Validate-config command - validate routing configuration files.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracking_config::{ConfigLoader, RoutingConfig};

use crate::output::{self, CommandResult, OutputFormat};

/// Arguments for the validate-config command.
#[derive(Args, Debug)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    #[arg(short, long)]
    pub file: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Validation result.
#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub file: String,
    pub warnings: Vec<ValidationMessage>,
    pub errors: Vec<ValidationMessage>,
}

/// Validation message.
#[derive(Debug, Serialize)]
pub struct ValidationMessage {
    pub level: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationMessage {
    fn warning(message: impl Into<String>, path: &str) -> Self {
        Self {
            level: "warning".to_string(),
            message: message.into(),
            path: Some(path.to_string()),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: "error".to_string(),
            message: message.into(),
            path: None,
        }
    }
}

/// Validate a configuration file. Environment overrides are not applied.
pub fn validate_file(file: &PathBuf, strict: bool) -> ValidationResult {
    let mut result = ValidationResult {
        valid: true,
        file: file.display().to_string(),
        warnings: Vec::new(),
        errors: Vec::new(),
    };

    match ConfigLoader::new()
        .with_env_overrides(false)
        .with_file(file)
        .load()
    {
        Ok(config) => check_semantics(&config, &mut result),
        Err(e) => {
            result.valid = false;
            result.errors.push(ValidationMessage::error(e.to_string()));
        }
    }

    if strict && !result.warnings.is_empty() {
        result.valid = false;
    }
    result
}

/// Flag settings that load fine but route unexpectedly.
fn check_semantics(config: &RoutingConfig, result: &mut ValidationResult) {
    let weights = &config.scoring.weights;

    if weights.free_first.cost <= weights.free_first.reliability {
        result.warnings.push(ValidationMessage::warning(
            "free_first weighs reliability at least as much as cost",
            "scoring.weights.free_first",
        ));
    }

    if weights.reliability_first.reliability <= weights.reliability_first.cost {
        result.warnings.push(ValidationMessage::warning(
            "reliability_first weighs cost at least as much as reliability",
            "scoring.weights.reliability_first",
        ));
    }

    // The match bonus must outweigh the largest reliability + cost spread for
    // an exact match to rank its carrier first.
    let spread = [weights.free_first, weights.reliability_first, weights.paid_first]
        .iter()
        .map(|w| w.reliability + w.cost)
        .fold(0.0_f64, f64::max);
    let exact_bonus = config.scoring.carrier_match_bonus * config.pattern.exact_confidence;
    if exact_bonus <= spread {
        result.warnings.push(ValidationMessage::warning(
            format!(
                "carrier_match_bonus yields {exact_bonus:.1} for exact matches, \
                 not above the strategy weight spread of {spread:.1}"
            ),
            "scoring.carrier_match_bonus",
        ));
    }

    if config.reputation.failure_window < Duration::from_secs(60) {
        result.warnings.push(ValidationMessage::warning(
            "failure_window under one minute forgets failures almost immediately",
            "reputation.failure_window",
        ));
    }
}

/// Execute the validate-config command.
pub fn execute(args: &ValidateConfigArgs, json: bool) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);
    let result = validate_file(&args.file, args.strict);
    print_result(result, format)
}

fn print_result(result: ValidationResult, format: OutputFormat) -> Result<()> {
    let valid = result.valid;

    match format {
        OutputFormat::Json => {
            let command_result = if valid {
                let message = format!("{} is valid", result.file);
                CommandResult::success(result).with_message(message)
            } else {
                let message = format!("{} is invalid", result.file);
                CommandResult::failure(message).with_data(result)
            };
            command_result.print(format)?;
        }
        OutputFormat::Text => {
            for err in &result.errors {
                output::error(&err.message);
            }
            for warn in &result.warnings {
                let location = warn.path.as_deref().unwrap_or("-");
                output::warning(&format!("{} ({location})", warn.message));
            }
            if valid {
                output::success(&format!("{} is valid", result.file));
            } else {
                output::error(&format!("{} is invalid", result.file));
            }
        }
    }

    if valid {
        Ok(())
    } else {
        anyhow::bail!("configuration validation failed")
    }
}

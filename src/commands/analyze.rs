//! Analyze command - show the routing decision for a tracking number.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use tabled::Tabled;
use tracking_config::RoutingConfig;
use tracking_core::{
    FailureKind, ProviderFailure, RoutingDecision, TrackingContext, TrackingType, UserTier,
};
use tracking_routing::{
    CompositeObserver, DecisionObserver, Router, ScoredProvider, TracingObserver,
};
use tracking_telemetry::RoutingMetrics;

use crate::output::{self, CommandResult, OutputFormat};

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Tracking number to route
    pub tracking_number: String,

    /// Tracking number type (container, booking, bol)
    #[arg(short = 't', long = "type", default_value = "container")]
    pub tracking_type: String,

    /// Subscription tier of the caller (free, premium, enterprise)
    #[arg(long)]
    pub tier: Option<UserTier>,

    /// Prefer cheap providers
    #[arg(long)]
    pub cost: bool,

    /// Prefer reliable providers
    #[arg(long)]
    pub reliability: bool,

    /// Provider already tried without success (repeatable)
    #[arg(long = "failed", value_name = "PROVIDER")]
    pub failed: Vec<String>,

    /// Record a failure for a provider before routing (repeatable)
    #[arg(long = "report-failure", value_name = "PROVIDER")]
    pub report_failure: Vec<String>,

    /// Show the score breakdown of every provider
    #[arg(long)]
    pub explain: bool,

    /// Print routing metrics in Prometheus text format
    #[arg(long)]
    pub metrics: bool,
}

/// Analyze command output.
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    /// The routing decision
    pub decision: RoutingDecision,
    /// Per-provider scores
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<ScoredProvider>>,
    /// Prometheus export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<String>,
}

/// Provider score row for table display.
#[derive(Debug, Tabled)]
struct ScoreRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Match")]
    carrier_match: String,
    #[tabled(rename = "Reliability")]
    reliability: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Penalty")]
    penalty: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl ScoreRow {
    fn from_scored(rank: usize, scored: &ScoredProvider) -> Self {
        let b = &scored.breakdown;
        Self {
            rank,
            provider: scored.provider.clone(),
            carrier_match: output::format_score(b.carrier_match),
            reliability: output::format_score(b.reliability),
            cost: output::format_score(b.cost),
            penalty: output::format_score(b.failure_penalty + b.avoidance_penalty),
            total: output::format_score(b.total),
        }
    }
}

/// Build the tracking context from command-line arguments.
pub fn build_context(args: &AnalyzeArgs) -> Result<TrackingContext> {
    let mut builder = TrackingContext::builder()
        .tracking_number(args.tracking_number.as_str())
        .tracking_type(TrackingType::parse_lenient(&args.tracking_type))
        .cost_optimization(args.cost)
        .reliability_optimization(args.reliability)
        .previous_failures(args.failed.iter().cloned());

    if let Some(tier) = args.tier {
        builder = builder.user_tier(tier);
    }

    builder.build().context("Invalid tracking context")
}

/// Execute the analyze command.
pub fn execute(args: &AnalyzeArgs, config: &RoutingConfig, json: bool) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);
    let context = build_context(args)?;

    let metrics = if args.metrics {
        Some(Arc::new(RoutingMetrics::new()?))
    } else {
        None
    };

    let mut observer = CompositeObserver::default().with(Arc::new(TracingObserver));
    if let Some(metrics) = &metrics {
        observer = observer.with(Arc::clone(metrics) as Arc<dyn DecisionObserver>);
    }

    let router = Router::builder()
        .config(config.clone())
        .observer(Arc::new(observer))
        .build();

    for provider in &args.report_failure {
        router.record_failure(
            provider,
            &ProviderFailure::new(provider.as_str(), FailureKind::Unknown, "reported from command line"),
        );
    }

    let decision = router.analyze_routing(&context);
    let breakdown = args.explain.then(|| router.explain_routing(&context));
    let metrics = metrics.map(|m| m.export_text()).transpose()?;

    let result = AnalyzeOutput {
        decision,
        breakdown,
        metrics,
    };

    match format {
        OutputFormat::Json => CommandResult::success(result).print(format),
        OutputFormat::Text => {
            print_text(&result);
            Ok(())
        }
    }
}

fn print_text(result: &AnalyzeOutput) {
    let decision = &result.decision;

    output::section("Routing Decision");
    output::key_value(
        "Suggested carrier",
        &decision
            .suggested_carrier
            .map_or_else(|| "none".to_string(), |c| c.to_string()),
    );
    output::key_value("Confidence", &output::format_confidence(decision.confidence));
    output::key_value("Strategy", decision.fallback_strategy.as_str());
    output::key_value("Top choice", decision.top_choice());
    output::key_value("Fallbacks", &decision.fallbacks().join(", "));
    output::key_value("Reasoning", &decision.reasoning);

    if let Some(breakdown) = &result.breakdown {
        output::section("Score Breakdown");
        let rows: Vec<ScoreRow> = breakdown
            .iter()
            .enumerate()
            .map(|(i, scored)| ScoreRow::from_scored(i + 1, scored))
            .collect();
        output::table(&rows);
    }

    if let Some(metrics) = &result.metrics {
        output::section("Metrics");
        print!("{metrics}");
    }
}

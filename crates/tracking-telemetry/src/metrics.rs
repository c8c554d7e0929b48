//! Prometheus metrics for routing activity.
//!
//! [`RoutingMetrics`] is a [`DecisionObserver`]: attach it to a router
//! (usually inside a `CompositeObserver` next to the tracing observer) and
//! scrape the text export.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracking_core::{Carrier, FailureKind};
use tracking_routing::{DecisionObserver, RoutingEvent};

const NAMESPACE: &str = "tracking_router";

/// Metrics errors
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Metric could not be created or registered
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    /// Export produced invalid UTF-8
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

/// Counters and histograms fed by routing events
#[derive(Debug, Clone)]
pub struct RoutingMetrics {
    registry: Registry,
    decisions: IntCounterVec,
    suggestions: IntCounterVec,
    failures: IntCounterVec,
    successes: IntCounterVec,
    resets: IntCounter,
    confidence: Histogram,
    latency: Histogram,
}

impl RoutingMetrics {
    /// Create metrics in a fresh registry
    ///
    /// # Errors
    /// Returns error if a metric cannot be registered
    pub fn new() -> Result<Self, MetricsError> {
        Self::with_registry(Registry::new())
    }

    /// Create metrics in an existing registry
    ///
    /// # Errors
    /// Returns error if a metric cannot be registered, e.g. twice in the
    /// same registry
    pub fn with_registry(registry: Registry) -> Result<Self, MetricsError> {
        let decisions = IntCounterVec::new(
            Opts::new("decisions_total", "Routing decisions produced").namespace(NAMESPACE),
            &["strategy", "tracking_type"],
        )?;
        let suggestions = IntCounterVec::new(
            Opts::new("carrier_suggestions_total", "Decisions by suggested carrier")
                .namespace(NAMESPACE),
            &["carrier"],
        )?;
        let failures = IntCounterVec::new(
            Opts::new("provider_failures_total", "Reported provider failures").namespace(NAMESPACE),
            &["provider", "error_type"],
        )?;
        let successes = IntCounterVec::new(
            Opts::new("provider_successes_total", "Reported provider successes")
                .namespace(NAMESPACE),
            &["provider"],
        )?;
        let resets = IntCounter::with_opts(
            Opts::new("reputation_resets_total", "Reputation resets").namespace(NAMESPACE),
        )?;
        let confidence = Histogram::with_opts(
            HistogramOpts::new("detection_confidence", "Carrier detection confidence")
                .namespace(NAMESPACE)
                .buckets(vec![0.0, 0.1, 0.3, 0.5, 0.7, 0.9, 0.95, 1.0]),
        )?;
        let latency = Histogram::with_opts(
            HistogramOpts::new("decision_latency_seconds", "Time to produce a decision")
                .namespace(NAMESPACE)
                .buckets(vec![0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01]),
        )?;

        registry.register(Box::new(decisions.clone()))?;
        registry.register(Box::new(suggestions.clone()))?;
        registry.register(Box::new(failures.clone()))?;
        registry.register(Box::new(successes.clone()))?;
        registry.register(Box::new(resets.clone()))?;
        registry.register(Box::new(confidence.clone()))?;
        registry.register(Box::new(latency.clone()))?;

        Ok(Self {
            registry,
            decisions,
            suggestions,
            failures,
            successes,
            resets,
            confidence,
            latency,
        })
    }

    /// The registry holding these metrics
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Decisions counted for a strategy and tracking type
    #[must_use]
    pub fn decisions(&self, strategy: &str, tracking_type: &str) -> u64 {
        self.decisions
            .get_metric_with_label_values(&[strategy, tracking_type])
            .map_or(0, |c| c.get())
    }

    /// Failures counted for a provider across error types
    #[must_use]
    pub fn failures(&self, provider: &str) -> u64 {
        FailureKind::ALL
            .iter()
            .filter_map(|kind| {
                self.failures
                    .get_metric_with_label_values(&[provider, kind.as_str()])
                    .ok()
            })
            .map(|c| c.get())
            .sum()
    }

    /// Export all metrics in Prometheus text format
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn export_text(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }
}

impl DecisionObserver for RoutingMetrics {
    fn observe(&self, event: &RoutingEvent) {
        match event {
            RoutingEvent::Decision {
                tracking_type,
                strategy,
                suggested_carrier,
                confidence,
                latency_us,
                ..
            } => {
                self.decisions
                    .with_label_values(&[strategy.as_str(), tracking_type.as_str()])
                    .inc();
                let carrier = suggested_carrier.map_or("none", Carrier::id);
                self.suggestions.with_label_values(&[carrier]).inc();
                self.confidence.observe(*confidence);
                self.latency.observe(*latency_us as f64 / 1_000_000.0);
            }
            RoutingEvent::Failure {
                provider,
                error_type,
                ..
            } => {
                self.failures
                    .with_label_values(&[provider.as_str(), error_type.as_str()])
                    .inc();
            }
            RoutingEvent::Success { provider, .. } => {
                self.successes.with_label_values(&[provider.as_str()]).inc();
            }
            RoutingEvent::Reset { .. } => self.resets.inc(),
        }
    }
}

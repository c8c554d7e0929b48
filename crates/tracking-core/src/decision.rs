//! Routing outputs and outcome reports.

use crate::types::{Carrier, FailureKind, FallbackStrategy, MatchKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of matching a tracking number against known carrier formats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarrierMatch {
    /// Detected carrier, if any
    pub carrier: Option<Carrier>,
    /// Certainty in `[0, 1]`
    pub confidence: f64,
    /// How the carrier was recognized
    pub kind: MatchKind,
}

impl CarrierMatch {
    /// A full signature match.
    #[must_use]
    pub fn exact(carrier: Carrier, confidence: f64) -> Self {
        Self {
            carrier: Some(carrier),
            confidence: confidence.clamp(0.0, 1.0),
            kind: MatchKind::Exact,
        }
    }

    /// A prefix-only match.
    #[must_use]
    pub fn heuristic(carrier: Carrier, confidence: f64) -> Self {
        Self {
            carrier: Some(carrier),
            confidence: confidence.clamp(0.0, 1.0),
            kind: MatchKind::Heuristic,
        }
    }

    /// No carrier recognized.
    #[must_use]
    pub fn none(confidence: f64) -> Self {
        Self {
            carrier: None,
            confidence: confidence.clamp(0.0, 1.0),
            kind: MatchKind::None,
        }
    }

    /// The carrier, if confidence is strictly above `threshold`.
    #[must_use]
    pub fn confident_carrier(&self, threshold: f64) -> Option<Carrier> {
        self.carrier.filter(|_| self.confidence > threshold)
    }
}

/// The router's answer for one tracking context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Carrier the number most likely belongs to
    pub suggested_carrier: Option<Carrier>,
    /// Confidence of the carrier detection, in `[0, 1]`
    pub confidence: f64,
    /// Provider ids to try, best first; never empty
    pub prioritized_providers: Vec<String>,
    /// Strategy that shaped the ordering
    pub fallback_strategy: FallbackStrategy,
    /// Human-readable explanation
    pub reasoning: String,
}

impl RoutingDecision {
    /// The provider to try first.
    #[must_use]
    pub fn top_choice(&self) -> &str {
        self.prioritized_providers
            .first()
            .map_or("", String::as_str)
    }

    /// Providers to fall back to after the top choice.
    #[must_use]
    pub fn fallbacks(&self) -> &[String] {
        self.prioritized_providers.get(1..).unwrap_or_default()
    }
}

/// A failed lookup reported back by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    /// Provider that failed
    pub provider: String,
    /// Category of the failure
    #[serde(default)]
    pub error_type: FailureKind,
    /// Free-form error message
    #[serde(default)]
    pub message: String,
}

impl ProviderFailure {
    /// Create a failure report.
    #[must_use]
    pub fn new(
        provider: impl Into<String>,
        error_type: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            error_type,
            message: message.into(),
        }
    }

    /// Create a timeout report.
    #[must_use]
    pub fn timeout(provider: impl Into<String>) -> Self {
        Self::new(provider, FailureKind::Timeout, "request timed out")
    }
}

/// Observability view of one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderStats {
    /// Provider id
    pub provider: String,
    /// Base cost per lookup in cents; `None` for unregistered providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    /// Base reliability; `None` for unregistered providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability: Option<f64>,
    /// Failures not yet offset by successes
    pub recent_failures: u32,
    /// Time of the last reported failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<DateTime<Utc>>,
    /// Time of the last reported success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success: Option<DateTime<Utc>>,
}

//! Multi-criteria provider scoring.
//!
//! Every candidate provider receives an additive score:
//!
//! | Term              | Value                                                   |
//! |-------------------|---------------------------------------------------------|
//! | carrier match     | `carrier_match_bonus * confidence` for the matched carrier |
//! | reliability       | `weight.reliability * base_reliability`                 |
//! | cost              | `weight.cost * (1 - min(cost, ceiling) / ceiling)`      |
//! | failure penalty   | `min(failures * failure_penalty, failure_penalty_cap)`  |
//! | avoidance penalty | `previous_failure_penalty` if the caller already tried it |
//!
//! Weights depend on the fallback strategy. Providers are ordered by total
//! score, highest first; ties keep registry declaration order.

use crate::registry::{ProviderProfile, ProviderRegistry};
use crate::reputation::ReputationTracker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracking_config::ScoringConfig;
use tracking_core::{Carrier, CarrierMatch, FallbackStrategy, TrackingContext};

/// Contribution of each scoring term for one provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Carrier-match bonus
    pub carrier_match: f64,
    /// Weighted reliability
    pub reliability: f64,
    /// Weighted cheapness
    pub cost: f64,
    /// Penalty for recent reported failures (non-negative)
    pub failure_penalty: f64,
    /// Penalty for caller-reported previous failures (non-negative)
    pub avoidance_penalty: f64,
    /// Final score
    pub total: f64,
}

/// A provider with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProvider {
    /// Provider id
    pub provider: String,
    /// Failures counted against the provider when scored
    pub recent_failures: u32,
    /// Per-term contributions
    pub breakdown: ScoreBreakdown,
}

/// Ranked providers plus the carrier suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringOutcome {
    /// Providers, best first
    pub ranked: Vec<ScoredProvider>,
    /// Carrier suggested to the caller
    pub suggested_carrier: Option<Carrier>,
    /// Detection confidence
    pub confidence: f64,
}

impl ScoringOutcome {
    /// Provider ids in ranked order
    #[must_use]
    pub fn provider_ids(&self) -> Vec<String> {
        self.ranked.iter().map(|s| s.provider.clone()).collect()
    }
}

/// Scores and orders candidate providers
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
    suggestion_threshold: f64,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), 0.5)
    }
}

impl ScoringEngine {
    /// Create an engine. A detected carrier is only suggested when its
    /// confidence is strictly above `suggestion_threshold`.
    #[must_use]
    pub fn new(config: ScoringConfig, suggestion_threshold: f64) -> Self {
        Self {
            config,
            suggestion_threshold,
        }
    }

    /// Scoring constants in use
    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score every candidate for the context and rank them.
    #[must_use]
    pub fn score(
        &self,
        registry: &ProviderRegistry,
        reputation: &ReputationTracker,
        context: &TrackingContext,
        carrier_match: &CarrierMatch,
        strategy: FallbackStrategy,
        now: DateTime<Utc>,
    ) -> ScoringOutcome {
        let mut ranked: Vec<ScoredProvider> = registry
            .candidates_for(context.tracking_type)
            .into_iter()
            .map(|profile| {
                let recent_failures = reputation.effective_failures(&profile.id, now);
                ScoredProvider {
                    provider: profile.id.clone(),
                    recent_failures,
                    breakdown: self.score_provider(
                        profile,
                        context,
                        carrier_match,
                        strategy,
                        recent_failures,
                    ),
                }
            })
            .collect();

        // Stable: equal totals keep declaration order.
        ranked.sort_by(|a, b| b.breakdown.total.total_cmp(&a.breakdown.total));

        debug!(
            strategy = %strategy,
            candidates = ranked.len(),
            top = ranked.first().map_or("", |s| s.provider.as_str()),
            "Providers scored"
        );

        ScoringOutcome {
            ranked,
            suggested_carrier: carrier_match.confident_carrier(self.suggestion_threshold),
            confidence: carrier_match.confidence,
        }
    }

    /// Score a single provider.
    #[must_use]
    pub fn score_provider(
        &self,
        profile: &ProviderProfile,
        context: &TrackingContext,
        carrier_match: &CarrierMatch,
        strategy: FallbackStrategy,
        recent_failures: u32,
    ) -> ScoreBreakdown {
        let weights = self.config.weights.for_strategy(strategy);

        let carrier_match_bonus = match (carrier_match.carrier, profile.carrier) {
            (Some(detected), Some(own)) if detected == own => {
                self.config.carrier_match_bonus * carrier_match.confidence
            }
            _ => 0.0,
        };

        let reliability = weights.reliability * profile.base_reliability;
        let cost = weights.cost * self.cheapness(profile.base_cost_cents);

        let failure_penalty = (f64::from(recent_failures) * self.config.failure_penalty)
            .min(self.config.failure_penalty_cap);

        let avoidance_penalty = if context.previously_failed(&profile.id) {
            self.config.previous_failure_penalty
        } else {
            0.0
        };

        ScoreBreakdown {
            carrier_match: carrier_match_bonus,
            reliability,
            cost,
            failure_penalty,
            avoidance_penalty,
            total: carrier_match_bonus + reliability + cost - failure_penalty - avoidance_penalty,
        }
    }

    /// 1 for free providers, 0 at or above the cost ceiling.
    fn cheapness(&self, cost_cents: u32) -> f64 {
        let ceiling = self.config.cost_ceiling_cents;
        if ceiling == 0 {
            return if cost_cents == 0 { 1.0 } else { 0.0 };
        }
        1.0 - f64::from(cost_cents.min(ceiling)) / f64::from(ceiling)
    }
}

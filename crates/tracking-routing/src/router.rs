//! Router facade.
//!
//! [`Router`] runs the full pipeline for one tracking context: carrier
//! detection, strategy selection, scoring against the registry and the
//! current reputation, and reasoning. It is `Send + Sync` and meant to be
//! shared behind an `Arc`.

use crate::clock::{Clock, SystemClock};
use crate::observer::{DecisionObserver, RoutingEvent, TracingObserver};
use crate::pattern::PatternMatcher;
use crate::reasoning::ReasoningGenerator;
use crate::registry::{ProviderProfile, ProviderRegistry};
use crate::reputation::{ProviderReputation, ReputationTracker};
use crate::scoring::{ScoredProvider, ScoringEngine, ScoringOutcome};
use crate::strategy::StrategySelector;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};
use tracking_config::RoutingConfig;
use tracking_core::{
    CarrierMatch, FallbackStrategy, ProviderFailure, ProviderStats, RoutingDecision,
    TrackingContext,
};
use uuid::Uuid;

/// Activity counters of a router
#[derive(Debug, Default)]
struct RouterCounters {
    decisions: AtomicU64,
    failures_reported: AtomicU64,
    successes_reported: AtomicU64,
}

/// Snapshot of router activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterStats {
    /// Routing decisions produced
    pub decisions: u64,
    /// Failure reports received
    pub failures_reported: u64,
    /// Success reports received
    pub successes_reported: u64,
}

/// Provider routing engine
#[derive(Debug)]
pub struct Router {
    registry: Arc<ProviderRegistry>,
    reputation: Arc<ReputationTracker>,
    matcher: PatternMatcher,
    selector: StrategySelector,
    engine: ScoringEngine,
    reasoning: ReasoningGenerator,
    observer: Arc<dyn DecisionObserver>,
    counters: RouterCounters,
}

impl Router {
    /// Create a router with the standard registry
    #[must_use]
    pub fn new(config: RoutingConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Create a new builder
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Decide which providers to query, and in what order.
    ///
    /// Never fails; degenerate input yields a low-confidence decision over
    /// the broadest applicable provider set.
    #[instrument(
        skip(self, context),
        fields(tracking_type = %context.tracking_type, user_tier = %context.user_tier)
    )]
    pub fn analyze_routing(&self, context: &TrackingContext) -> RoutingDecision {
        let start = Instant::now();
        let (carrier_match, strategy, outcome) = self.evaluate(context);

        let prioritized_providers = outcome.provider_ids();
        let top_choice = prioritized_providers.first().map_or("", String::as_str);
        let reasoning = self.reasoning.generate(
            context,
            outcome.suggested_carrier.map(|c| (c, outcome.confidence)),
            top_choice,
        );

        let latency_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.counters.decisions.fetch_add(1, Ordering::Relaxed);
        self.observer.observe(&RoutingEvent::Decision {
            execution_ref: Uuid::new_v4(),
            tracking_type: context.tracking_type,
            strategy,
            suggested_carrier: outcome.suggested_carrier,
            confidence: carrier_match.confidence,
            top_choice: top_choice.to_string(),
            candidate_count: prioritized_providers.len(),
            latency_us,
            timestamp: self.reputation.now(),
        });

        RoutingDecision {
            suggested_carrier: outcome.suggested_carrier,
            confidence: outcome.confidence,
            prioritized_providers,
            fallback_strategy: strategy,
            reasoning,
        }
    }

    /// Score breakdown of every candidate, best first
    #[must_use]
    pub fn explain_routing(&self, context: &TrackingContext) -> Vec<ScoredProvider> {
        let (_, _, outcome) = self.evaluate(context);
        outcome.ranked
    }

    fn evaluate(
        &self,
        context: &TrackingContext,
    ) -> (CarrierMatch, FallbackStrategy, ScoringOutcome) {
        let carrier_match = self.matcher.detect_carrier(&context.tracking_number);
        let strategy = self.selector.select_strategy(context);
        debug!(
            carrier = ?carrier_match.carrier,
            confidence = carrier_match.confidence,
            kind = ?carrier_match.kind,
            strategy = %strategy,
            "Carrier detected and strategy selected"
        );

        let outcome = self.engine.score(
            &self.registry,
            &self.reputation,
            context,
            &carrier_match,
            strategy,
            self.reputation.now(),
        );
        (carrier_match, strategy, outcome)
    }

    /// Detect the carrier of a tracking number
    #[must_use]
    pub fn detect_carrier(&self, tracking_number: &str) -> CarrierMatch {
        self.matcher.detect_carrier(tracking_number)
    }

    /// Strategy that would be applied to a context
    #[must_use]
    pub fn select_strategy(&self, context: &TrackingContext) -> FallbackStrategy {
        self.selector.select_strategy(context)
    }

    /// Report a failed provider query. Accepts any id.
    #[instrument(skip(self, failure), fields(error_type = %failure.error_type))]
    pub fn record_failure(&self, provider_id: &str, failure: &ProviderFailure) {
        let recent_failures = self.reputation.record_failure(provider_id, failure);
        self.counters.failures_reported.fetch_add(1, Ordering::Relaxed);
        self.observer.observe(&RoutingEvent::Failure {
            provider: provider_id.to_string(),
            error_type: failure.error_type,
            recent_failures,
            timestamp: self.reputation.now(),
        });
    }

    /// Report a successful provider query. Accepts any id.
    #[instrument(skip(self))]
    pub fn record_success(&self, provider_id: &str) {
        let recent_failures = self.reputation.record_success(provider_id);
        self.counters.successes_reported.fetch_add(1, Ordering::Relaxed);
        self.observer.observe(&RoutingEvent::Success {
            provider: provider_id.to_string(),
            recent_failures,
            timestamp: self.reputation.now(),
        });
    }

    /// Stats for every registered provider, in declaration order
    #[must_use]
    pub fn provider_stats(&self) -> Vec<ProviderStats> {
        self.registry
            .iter()
            .map(|profile| {
                stats_view(&profile.id, Some(profile), &self.reputation.stats_of(&profile.id))
            })
            .collect()
    }

    /// Stats for a registered provider, or for any id that was reported
    #[must_use]
    pub fn provider_stats_including_unknown(&self, provider_id: &str) -> Option<ProviderStats> {
        let profile = self.registry.get(provider_id);
        let reputation = self.reputation.stats_including_unknown(provider_id);

        match (profile, reputation) {
            (None, None) => None,
            (profile, reputation) => Some(stats_view(
                provider_id,
                profile,
                &reputation.unwrap_or_default(),
            )),
        }
    }

    /// Forget all reported outcomes
    pub fn reset_reputation(&self) {
        self.reputation.reset();
        self.observer.observe(&RoutingEvent::Reset {
            timestamp: self.reputation.now(),
        });
    }

    /// Activity counters
    #[must_use]
    pub fn stats(&self) -> RouterStats {
        RouterStats {
            decisions: self.counters.decisions.load(Ordering::Relaxed),
            failures_reported: self.counters.failures_reported.load(Ordering::Relaxed),
            successes_reported: self.counters.successes_reported.load(Ordering::Relaxed),
        }
    }

    /// The provider catalog
    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The reputation store
    #[must_use]
    pub fn reputation(&self) -> &ReputationTracker {
        &self.reputation
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}

fn stats_view(
    provider_id: &str,
    profile: Option<&ProviderProfile>,
    reputation: &ProviderReputation,
) -> ProviderStats {
    ProviderStats {
        provider: provider_id.to_string(),
        cost: profile.map(|p| p.base_cost_cents),
        reliability: profile.map(|p| p.base_reliability),
        recent_failures: reputation.recent_failures,
        last_failure: reputation.last_failure,
        last_success: reputation.last_success,
    }
}

/// Builder for [`Router`]
#[derive(Debug, Default)]
pub struct RouterBuilder {
    config: Option<RoutingConfig>,
    registry: Option<Arc<ProviderRegistry>>,
    reputation: Option<Arc<ReputationTracker>>,
    clock: Option<Arc<dyn Clock>>,
    observer: Option<Arc<dyn DecisionObserver>>,
}

impl RouterBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the routing configuration
    #[must_use]
    pub fn config(mut self, config: RoutingConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom provider catalog
    #[must_use]
    pub fn registry(mut self, registry: Arc<ProviderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Share an existing reputation store. Its own recovery policy and
    /// failure window apply; the configured ones are ignored.
    #[must_use]
    pub fn reputation(mut self, reputation: Arc<ReputationTracker>) -> Self {
        self.reputation = Some(reputation);
        self
    }

    /// Time source for a newly created reputation store
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the decision observer
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the router
    #[must_use]
    pub fn build(self) -> Router {
        let config = self.config.unwrap_or_default();

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(ProviderRegistry::standard()));

        let reputation = self.reputation.unwrap_or_else(|| {
            let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
            Arc::new(ReputationTracker::with_clock(&config.reputation, clock))
        });

        let observer = self.observer.unwrap_or_else(|| Arc::new(TracingObserver));

        Router {
            registry,
            reputation,
            matcher: PatternMatcher::new(config.pattern.clone()),
            selector: StrategySelector::new(config.default_strategy),
            engine: ScoringEngine::new(config.scoring.clone(), config.pattern.suggestion_threshold),
            reasoning: ReasoningGenerator::new(),
            observer,
            counters: RouterCounters::default(),
        }
    }
}

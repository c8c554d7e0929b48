//! Fallback strategy selection.

use tracking_core::{FallbackStrategy, TrackingContext, UserTier};

/// Maps caller preferences to a fallback strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategySelector {
    default_strategy: FallbackStrategy,
}

impl StrategySelector {
    /// Create a selector using `default_strategy` when the caller expresses
    /// no preference
    #[must_use]
    pub const fn new(default_strategy: FallbackStrategy) -> Self {
        Self { default_strategy }
    }

    /// Strategy used when no tier or flag applies
    #[must_use]
    pub const fn default_strategy(&self) -> FallbackStrategy {
        self.default_strategy
    }

    /// Pick the strategy for a context.
    ///
    /// Reliability preferences win over cost preferences; the tier is
    /// consulted together with the matching flag.
    #[must_use]
    pub fn select_strategy(&self, context: &TrackingContext) -> FallbackStrategy {
        if context.reliability_optimization || context.user_tier == UserTier::Enterprise {
            FallbackStrategy::ReliabilityFirst
        } else if context.cost_optimization || context.user_tier == UserTier::Free {
            FallbackStrategy::FreeFirst
        } else if context.user_tier == UserTier::Premium {
            FallbackStrategy::PaidFirst
        } else {
            self.default_strategy
        }
    }
}

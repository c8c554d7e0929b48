//! Router configuration types.
//!
//! Defaults reproduce the router's documented behaviour:
//!
//! | Match kind            | Confidence |
//! |-----------------------|------------|
//! | Exact signature       | 0.95       |
//! | Carrier abbreviation  | 0.70       |
//! | Container-like code   | 0.30       |
//! | Anything else         | 0.10       |
//! | Empty input           | 0.00       |
//!
//! | Strategy            | Reliability weight | Cost weight |
//! |---------------------|--------------------|-------------|
//! | `reliability_first` | 60                 | 5           |
//! | `free_first`        | 20                 | 50          |
//! | `paid_first`        | 40                 | 2           |

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracking_core::FallbackStrategy;
use validator::Validate;

/// Top-level router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct RoutingConfig {
    /// Carrier detection confidences
    #[validate(nested)]
    pub pattern: PatternConfig,

    /// Provider scoring weights and penalties
    #[validate(nested)]
    pub scoring: ScoringConfig,

    /// Failure reputation behaviour
    pub reputation: ReputationConfig,

    /// Strategy used when the caller sets no tier and no optimization flag
    pub default_strategy: FallbackStrategy,
}

impl RoutingConfig {
    /// Validate field ranges and the ordering between confidence levels.
    ///
    /// # Errors
    /// Returns error if any value is out of range or the confidence levels
    /// would let an unrecognized number outrank a recognized one
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.validate()?;
        self.pattern.check_ordering()?;

        if self.reputation.failure_window.is_zero() {
            return Err(ConfigError::validation(
                "reputation.failure_window must be greater than 0",
            ));
        }

        if let RecoveryPolicy::Decrement { step: 0 } = self.reputation.recovery {
            return Err(ConfigError::validation(
                "reputation.recovery decrement step must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// Confidence levels produced by carrier detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PatternConfig {
    /// Full prefix + numeric suffix match
    #[validate(range(min = 0.0, max = 1.0))]
    pub exact_confidence: f64,

    /// Carrier abbreviation at the start of the number
    #[validate(range(min = 0.0, max = 1.0))]
    pub heuristic_confidence: f64,

    /// Unrecognized number that still looks like an ISO 6346 container code
    #[validate(range(min = 0.0, max = 1.0))]
    pub plausible_confidence: f64,

    /// Anything else that is not empty
    #[validate(range(min = 0.0, max = 1.0))]
    pub unrecognized_confidence: f64,

    /// A carrier is only suggested above this confidence
    #[validate(range(min = 0.0, max = 1.0))]
    pub suggestion_threshold: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            exact_confidence: 0.95,
            heuristic_confidence: 0.7,
            plausible_confidence: 0.3,
            unrecognized_confidence: 0.1,
            suggestion_threshold: 0.5,
        }
    }
}

impl PatternConfig {
    fn check_ordering(&self) -> ConfigResult<()> {
        if self.exact_confidence < self.heuristic_confidence {
            return Err(ConfigError::validation(
                "pattern.exact_confidence must be >= pattern.heuristic_confidence",
            ));
        }
        if self.heuristic_confidence <= self.suggestion_threshold {
            return Err(ConfigError::validation(
                "pattern.heuristic_confidence must be > pattern.suggestion_threshold",
            ));
        }
        if self.plausible_confidence > self.suggestion_threshold {
            return Err(ConfigError::validation(
                "pattern.plausible_confidence must be <= pattern.suggestion_threshold",
            ));
        }
        if self.unrecognized_confidence > self.plausible_confidence {
            return Err(ConfigError::validation(
                "pattern.unrecognized_confidence must be <= pattern.plausible_confidence",
            ));
        }
        Ok(())
    }
}

/// Relative weight of reliability and cost under one strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct StrategyWeights {
    /// Multiplier for base reliability
    #[validate(range(min = 0.0))]
    pub reliability: f64,
    /// Multiplier for the normalized cheapness of a provider
    #[validate(range(min = 0.0))]
    pub cost: f64,
}

impl StrategyWeights {
    /// Create a weight pair
    #[must_use]
    pub const fn new(reliability: f64, cost: f64) -> Self {
        Self { reliability, cost }
    }
}

/// Weights for every fallback strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StrategyWeightsTable {
    /// Weights under `free_first`
    #[validate(nested)]
    pub free_first: StrategyWeights,
    /// Weights under `reliability_first`
    #[validate(nested)]
    pub reliability_first: StrategyWeights,
    /// Weights under `paid_first`
    #[validate(nested)]
    pub paid_first: StrategyWeights,
}

impl Default for StrategyWeightsTable {
    fn default() -> Self {
        Self {
            free_first: StrategyWeights::new(20.0, 50.0),
            reliability_first: StrategyWeights::new(60.0, 5.0),
            paid_first: StrategyWeights::new(40.0, 2.0),
        }
    }
}

impl StrategyWeightsTable {
    /// Weights for a strategy
    #[must_use]
    pub fn for_strategy(&self, strategy: FallbackStrategy) -> StrategyWeights {
        match strategy {
            FallbackStrategy::FreeFirst => self.free_first,
            FallbackStrategy::ReliabilityFirst => self.reliability_first,
            FallbackStrategy::PaidFirst => self.paid_first,
        }
    }
}

/// Provider scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScoringConfig {
    /// Bonus for the detected carrier's own provider, scaled by confidence
    #[validate(range(min = 0.0))]
    pub carrier_match_bonus: f64,

    /// Costs at or above this many cents count as maximally expensive
    #[validate(range(min = 1))]
    pub cost_ceiling_cents: u32,

    /// Penalty per recent failure
    #[validate(range(min = 0.0))]
    pub failure_penalty: f64,

    /// Upper bound on the recent-failure penalty
    #[validate(range(min = 0.0))]
    pub failure_penalty_cap: f64,

    /// Fixed penalty for providers the caller already saw fail
    #[validate(range(min = 0.0))]
    pub previous_failure_penalty: f64,

    /// Per-strategy weights
    #[validate(nested)]
    pub weights: StrategyWeightsTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            carrier_match_bonus: 100.0,
            cost_ceiling_cents: 100,
            failure_penalty: 15.0,
            failure_penalty_cap: 60.0,
            previous_failure_penalty: 40.0,
            weights: StrategyWeightsTable::default(),
        }
    }
}

/// How a reported success offsets earlier failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Forget all recent failures
    #[default]
    Reset,
    /// Halve recent failures, rounding down
    Halve,
    /// Subtract a fixed number of failures
    Decrement {
        /// Failures forgiven per success
        step: u32,
    },
}

impl RecoveryPolicy {
    /// Recent failures remaining after one success
    #[must_use]
    pub fn apply(self, recent_failures: u32) -> u32 {
        match self {
            Self::Reset => 0,
            Self::Halve => recent_failures / 2,
            Self::Decrement { step } => recent_failures.saturating_sub(step),
        }
    }
}

impl fmt::Display for RecoveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => f.write_str("reset"),
            Self::Halve => f.write_str("halve"),
            Self::Decrement { step } => write!(f, "decrement:{step}"),
        }
    }
}

impl FromStr for RecoveryPolicy {
    type Err = ConfigError;

    /// Parses `reset`, `halve` or `decrement:<step>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.split_once(':') {
            None if value == "reset" => Ok(Self::Reset),
            None if value == "halve" => Ok(Self::Halve),
            None if value == "decrement" => Ok(Self::Decrement { step: 1 }),
            Some(("decrement", step)) => step
                .trim()
                .parse()
                .map(|step| Self::Decrement { step })
                .map_err(|e| ConfigError::validation(format!("invalid decrement step: {e}"))),
            _ => Err(ConfigError::validation(format!(
                "unknown recovery policy: {s}"
            ))),
        }
    }
}

/// Reputation tracking configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    /// Effect of a success on recent failures
    pub recovery: RecoveryPolicy,

    /// Failures older than this no longer penalize a provider
    #[serde(with = "humantime_serde")]
    pub failure_window: Duration,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            recovery: RecoveryPolicy::Reset,
            failure_window: Duration::from_secs(60 * 60),
        }
    }
}

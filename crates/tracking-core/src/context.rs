//! Tracking context: the caller's request to the router.

use crate::error::RoutingError;
use crate::types::{TrackingType, UserTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::{Validate, ValidationError};

/// Longest tracking number accepted by the builder.
pub const MAX_TRACKING_NUMBER_LEN: usize = 256;

/// Immutable description of a single tracking lookup.
///
/// `previous_failures` is an ordered set so that reasoning output and
/// scoring never depend on the order the caller reported failures in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TrackingContext {
    /// Raw tracking identifier as entered by the user
    #[validate(length(max = 256))]
    pub tracking_number: String,

    /// Kind of identifier
    #[serde(default)]
    pub tracking_type: TrackingType,

    /// Caller prefers cheap providers
    #[serde(default)]
    pub cost_optimization: bool,

    /// Caller prefers reliable providers
    #[serde(default)]
    pub reliability_optimization: bool,

    /// Subscription tier of the caller
    #[serde(default)]
    pub user_tier: UserTier,

    /// Provider ids the caller already tried without success
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    #[validate(custom(function = "validate_provider_ids"))]
    pub previous_failures: BTreeSet<String>,
}

fn validate_provider_ids(ids: &BTreeSet<String>) -> Result<(), ValidationError> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        let mut err = ValidationError::new("empty_provider_id");
        err.message = Some("provider ids must not be blank".into());
        return Err(err);
    }
    Ok(())
}

impl TrackingContext {
    /// Create a context with default preferences.
    ///
    /// Performs no validation; the router accepts any input.
    #[must_use]
    pub fn new(tracking_number: impl Into<String>, tracking_type: TrackingType) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            tracking_type,
            cost_optimization: false,
            reliability_optimization: false,
            user_tier: UserTier::None,
            previous_failures: BTreeSet::new(),
        }
    }

    /// Create a new builder for `TrackingContext`
    #[must_use]
    pub fn builder() -> TrackingContextBuilder {
        TrackingContextBuilder::default()
    }

    /// Whether the caller already saw this provider fail.
    #[must_use]
    pub fn previously_failed(&self, provider_id: &str) -> bool {
        self.previous_failures.contains(provider_id)
    }

    /// Parse and validate a context from JSON.
    ///
    /// # Errors
    /// Returns error if the JSON is malformed or a field is invalid
    pub fn from_json(json: &str) -> Result<Self, RoutingError> {
        let context: Self = serde_json::from_str(json)?;
        context.validate()?;
        Ok(context)
    }
}

/// Builder for `TrackingContext`
#[derive(Debug, Default)]
pub struct TrackingContextBuilder {
    tracking_number: Option<String>,
    tracking_type: TrackingType,
    cost_optimization: bool,
    reliability_optimization: bool,
    user_tier: UserTier,
    previous_failures: BTreeSet<String>,
}

impl TrackingContextBuilder {
    /// Set the tracking number
    #[must_use]
    pub fn tracking_number(mut self, tracking_number: impl Into<String>) -> Self {
        self.tracking_number = Some(tracking_number.into());
        self
    }

    /// Set the tracking type
    #[must_use]
    pub fn tracking_type(mut self, tracking_type: TrackingType) -> Self {
        self.tracking_type = tracking_type;
        self
    }

    /// Prefer cost-effective providers
    #[must_use]
    pub fn cost_optimization(mut self, enabled: bool) -> Self {
        self.cost_optimization = enabled;
        self
    }

    /// Prefer reliable providers
    #[must_use]
    pub fn reliability_optimization(mut self, enabled: bool) -> Self {
        self.reliability_optimization = enabled;
        self
    }

    /// Set the user tier
    #[must_use]
    pub fn user_tier(mut self, user_tier: UserTier) -> Self {
        self.user_tier = user_tier;
        self
    }

    /// Add a provider the caller already tried
    #[must_use]
    pub fn previous_failure(mut self, provider_id: impl Into<String>) -> Self {
        self.previous_failures.insert(provider_id.into());
        self
    }

    /// Add several providers the caller already tried
    #[must_use]
    pub fn previous_failures<I, S>(mut self, provider_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.previous_failures
            .extend(provider_ids.into_iter().map(Into::into));
        self
    }

    /// Build the context
    ///
    /// # Errors
    /// Returns error if the tracking number is missing or too long, or if a
    /// previous-failure id is blank
    pub fn build(self) -> Result<TrackingContext, RoutingError> {
        let tracking_number = self.tracking_number.ok_or_else(|| {
            RoutingError::validation_field("tracking_number", "tracking_number is required")
        })?;

        let context = TrackingContext {
            tracking_number,
            tracking_type: self.tracking_type,
            cost_optimization: self.cost_optimization,
            reliability_optimization: self.reliability_optimization,
            user_tier: self.user_tier,
            previous_failures: self.previous_failures,
        };

        context.validate()?;

        Ok(context)
    }
}

//! Observation hooks for routing activity.
//!
//! The router reports every decision and every outcome report to a
//! [`DecisionObserver`]. Observers must be cheap: they run inline on the
//! caller's thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracking_core::{Carrier, FailureKind, FallbackStrategy, TrackingType};
use uuid::Uuid;

/// Something the router did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoutingEvent {
    /// A routing decision was produced
    Decision {
        /// Unique reference for this analysis
        execution_ref: Uuid,
        /// Requested tracking type
        tracking_type: TrackingType,
        /// Strategy applied
        strategy: FallbackStrategy,
        /// Suggested carrier, if any
        #[serde(skip_serializing_if = "Option::is_none")]
        suggested_carrier: Option<Carrier>,
        /// Detection confidence
        confidence: f64,
        /// First prioritized provider
        top_choice: String,
        /// Number of ranked providers
        candidate_count: usize,
        /// Decision latency in microseconds
        latency_us: u64,
        /// Timestamp
        timestamp: DateTime<Utc>,
    },
    /// A provider query failure was reported
    Failure {
        /// Provider id
        provider: String,
        /// Failure category
        error_type: FailureKind,
        /// Failure counter after the report
        recent_failures: u32,
        /// Timestamp
        timestamp: DateTime<Utc>,
    },
    /// A provider query success was reported
    Success {
        /// Provider id
        provider: String,
        /// Failure counter after recovery
        recent_failures: u32,
        /// Timestamp
        timestamp: DateTime<Utc>,
    },
    /// All reputation was cleared
    Reset {
        /// Timestamp
        timestamp: DateTime<Utc>,
    },
}

impl RoutingEvent {
    /// Get the event type as a string
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Decision { .. } => "decision",
            Self::Failure { .. } => "failure",
            Self::Success { .. } => "success",
            Self::Reset { .. } => "reset",
        }
    }

    /// Get the timestamp
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Decision { timestamp, .. }
            | Self::Failure { timestamp, .. }
            | Self::Success { timestamp, .. }
            | Self::Reset { timestamp } => *timestamp,
        }
    }
}

/// Receives routing events
pub trait DecisionObserver: Send + Sync + std::fmt::Debug {
    /// Handle one event
    fn observe(&self, event: &RoutingEvent);
}

/// Logs events via tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DecisionObserver for TracingObserver {
    fn observe(&self, event: &RoutingEvent) {
        match event {
            RoutingEvent::Decision {
                execution_ref,
                tracking_type,
                strategy,
                suggested_carrier,
                confidence,
                top_choice,
                candidate_count,
                latency_us,
                ..
            } => {
                info!(
                    execution_ref = %execution_ref,
                    tracking_type = %tracking_type,
                    strategy = %strategy,
                    suggested_carrier = suggested_carrier.map_or("none", Carrier::id),
                    confidence = %confidence,
                    top_choice = %top_choice,
                    candidates = candidate_count,
                    latency_us = latency_us,
                    "Routing decision made"
                );
            }
            RoutingEvent::Failure {
                provider,
                error_type,
                recent_failures,
                ..
            } => {
                warn!(
                    provider = %provider,
                    error_type = %error_type,
                    recent_failures = recent_failures,
                    "Provider failure observed"
                );
            }
            RoutingEvent::Success {
                provider,
                recent_failures,
                ..
            } => {
                debug!(
                    provider = %provider,
                    recent_failures = recent_failures,
                    "Provider success observed"
                );
            }
            RoutingEvent::Reset { .. } => {
                info!("Provider reputation reset observed");
            }
        }
    }
}

/// Observer that drops all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl DecisionObserver for NoOpObserver {
    fn observe(&self, _event: &RoutingEvent) {}
}

/// Fans events out to several observers
#[derive(Debug, Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn DecisionObserver>>,
}

impl CompositeObserver {
    /// Create a composite observer
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn DecisionObserver>>) -> Self {
        Self { observers }
    }

    /// Add an observer
    #[must_use]
    pub fn with(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of observers
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether there are no observers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl DecisionObserver for CompositeObserver {
    fn observe(&self, event: &RoutingEvent) {
        for observer in &self.observers {
            observer.observe(event);
        }
    }
}

//! # Tracking Routing
//!
//! Provider routing for shipment-tracking lookups.
//!
//! This crate provides:
//! - A static catalog of tracking providers ([`ProviderRegistry`])
//! - Carrier detection from tracking-number formats ([`PatternMatcher`])
//! - Per-provider failure reputation ([`ReputationTracker`])
//! - Strategy selection and multi-criteria scoring
//! - Deterministic human-readable reasoning
//! - The [`Router`] facade that ties them together
//!
//! The router performs no I/O. Callers query providers in the returned
//! order and report each outcome back with [`Router::record_failure`] or
//! [`Router::record_success`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod observer;
pub mod pattern;
pub mod reasoning;
pub mod registry;
pub mod reputation;
pub mod router;
pub mod scoring;
pub mod strategy;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use observer::{
    CompositeObserver, DecisionObserver, NoOpObserver, RoutingEvent, TracingObserver,
};
pub use pattern::PatternMatcher;
pub use reasoning::ReasoningGenerator;
pub use registry::{ProviderKind, ProviderProfile, ProviderRegistry};
pub use reputation::{ProviderReputation, ReputationTracker};
pub use router::{Router, RouterBuilder, RouterStats};
pub use scoring::{ScoreBreakdown, ScoredProvider, ScoringEngine, ScoringOutcome};
pub use strategy::StrategySelector;

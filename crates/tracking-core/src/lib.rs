//! # Tracking Core
//!
//! Core types and error handling for the shipment tracking router.
//!
//! This crate provides the foundational types used throughout the router:
//! - Closed enums for tracking types, user tiers, carriers and strategies
//! - The strongly-typed [`TrackingContext`] input and its builder
//! - Routing outputs ([`RoutingDecision`], [`CarrierMatch`], [`ProviderStats`])
//! - Outcome reports ([`ProviderFailure`]) and the boundary error type

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod decision;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use context::{TrackingContext, TrackingContextBuilder};
pub use decision::{CarrierMatch, ProviderFailure, ProviderStats, RoutingDecision};
pub use error::{RoutingError, RoutingResult};
pub use types::{Carrier, FailureKind, FallbackStrategy, MatchKind, TrackingType, UserTier};

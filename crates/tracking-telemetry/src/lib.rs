//! # Tracking Telemetry
//!
//! Observability for the tracking router.
//!
//! This crate provides:
//! - Structured logging and OpenTelemetry tracing setup
//! - Prometheus metrics fed by routing events

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod metrics;
pub mod tracing_setup;

// Re-export main types
pub use metrics::{MetricsError, RoutingMetrics};
pub use tracing_setup::{init_tracing, shutdown_tracing, TracingConfig, TracingError};

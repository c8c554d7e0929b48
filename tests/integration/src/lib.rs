//! Integration tests for the shipment tracking router
//!
//! This crate exercises the router end to end:
//! - Carrier detection and provider ordering
//! - Strategy selection by tier and optimization flags
//! - Failure reputation, recovery and expiry
//! - Concurrent outcome reporting
//! - Configuration loading

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
pub use fixtures::*;
pub use helpers::*;

#[cfg(test)]
mod concurrency_tests;
#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod reputation_tests;
#[cfg(test)]
mod routing_tests;

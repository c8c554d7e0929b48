//! # Tracking Config
//!
//! Configuration for the shipment tracking router.
//!
//! Every numeric constant the router uses lives here: carrier detection
//! confidences, per-strategy score weights, failure penalties, the reputation
//! recovery policy and the failure window. Values can be loaded from TOML,
//! YAML or JSON files and overridden from the environment.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;

// Re-export main types
pub use config::{
    PatternConfig, RecoveryPolicy, ReputationConfig, RoutingConfig, ScoringConfig,
    StrategyWeights, StrategyWeightsTable,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, ENV_CONFIG_PATH};

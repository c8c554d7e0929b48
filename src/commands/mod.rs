//! CLI commands module.

pub mod analyze;
pub mod detect;
pub mod providers;
pub mod validate_config;

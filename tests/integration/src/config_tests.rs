//! Configuration integration tests
//!
//! Configuration files change router behaviour end to end.

use crate::fixtures::*;
use crate::helpers::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;
use tracking_config::{ConfigLoader, RecoveryPolicy};
use tracking_core::FallbackStrategy;
use tracking_routing::{NoOpObserver, Router};

fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

fn router_from(file: &tempfile::NamedTempFile) -> Router {
    init_tracing();
    let config = ConfigLoader::new()
        .with_env_overrides(false)
        .with_file(file.path())
        .load()
        .expect("Failed to load config");

    Router::builder()
        .config(config)
        .observer(Arc::new(NoOpObserver))
        .build()
}

/// The default strategy comes from the file
#[test]
fn test_default_strategy_from_toml() {
    let file = write_config(".toml", "default_strategy = \"free_first\"\n");
    let router = router_from(&file);

    let decision = router.analyze_routing(&container_context("UNKN1234567"));
    assert_eq!(decision.fallback_strategy, FallbackStrategy::FreeFirst);
    assert_top_choice(&decision, "shipsgo");
}

/// Recovery policy and window load from YAML
#[test]
fn test_reputation_from_yaml() {
    let file = write_config(
        ".yaml",
        "reputation:\n  recovery:\n    mode: halve\n  failure_window: 10m\n",
    );
    let router = router_from(&file);

    assert_eq!(router.reputation().recovery(), RecoveryPolicy::Halve);
    assert_eq!(
        router.reputation().failure_window(),
        std::time::Duration::from_secs(600)
    );

    for _ in 0..4 {
        router.record_failure("one-line", &timeout("one-line"));
    }
    router.record_success("one-line");
    assert_eq!(router.reputation().stats_of("one-line").recent_failures, 2);
}

/// Detection confidences load from JSON
#[test]
fn test_pattern_confidences_from_json() {
    let file = write_config(
        ".json",
        r#"{"pattern": {"suggestion_threshold": 0.65, "plausible_confidence": 0.3}}"#,
    );
    let router = router_from(&file);

    let decision = router.analyze_routing(&container_context("MAE123456789"));
    assert!(decision.suggested_carrier.is_some());

    let file = write_config(
        ".json",
        r#"{"pattern": {"heuristic_confidence": 0.7, "suggestion_threshold": 0.5, "exact_confidence": 0.8}}"#,
    );
    let router = router_from(&file);
    let detected = router.detect_carrier("MAEU1234567");
    assert!((detected.confidence - 0.8).abs() < f64::EPSILON);
}

/// Invalid files are rejected before a router is built
#[test]
fn test_invalid_config_rejected() {
    let file = write_config(".toml", "[pattern]\nsuggestion_threshold = 0.9\n");
    let result = ConfigLoader::new()
        .with_env_overrides(false)
        .with_file(file.path())
        .load();
    assert!(result.is_err());
}

/// Environment overrides win over the file
#[test]
fn test_env_override() {
    let file = write_config(".toml", "default_strategy = \"free_first\"\n");
    let config = ConfigLoader::new()
        .with_file(file.path())
        .with_env_source(|key| {
            (key == "TRACKING_ROUTER_DEFAULT_STRATEGY").then(|| "reliability_first".to_string())
        })
        .load()
        .unwrap();

    assert_eq!(config.default_strategy, FallbackStrategy::ReliabilityFirst);
}

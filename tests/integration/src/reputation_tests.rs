//! Reputation integration tests
//!
//! Tests for outcome reporting, recovery policies, failure expiry and the
//! provider stats views.

use crate::fixtures::*;
use crate::helpers::*;
use chrono::Duration;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tracking_config::{RecoveryPolicy, RoutingConfig};
use tracking_core::{FailureKind, UserTier};
use tracking_routing::{ReputationTracker, Router};

fn config_with_recovery(recovery: RecoveryPolicy) -> RoutingConfig {
    let mut config = RoutingConfig::default();
    config.reputation.recovery = recovery;
    config
}

/// Failures are counted and a success resets them
#[test]
fn test_failures_then_success() {
    let router = test_router();

    router.record_failure("maersk", &timeout("maersk"));
    router.record_failure("maersk", &server_error("maersk"));

    let stats = router.provider_stats();
    let maersk = stats.iter().find(|s| s.provider == "maersk").unwrap();
    assert_eq!(maersk.recent_failures, 2);
    assert!(maersk.last_failure.is_some());
    assert_eq!(maersk.cost, Some(50));

    router.record_success("maersk");
    let maersk = router.provider_stats_including_unknown("maersk").unwrap();
    assert_eq!(maersk.recent_failures, 0);
    assert!(maersk.last_success.is_some());
    assert!(maersk.last_failure.is_some());

    let reputation = router.reputation().stats_of("maersk");
    assert_eq!(reputation.total_failures, 2);
    assert_eq!(reputation.total_successes, 1);
    assert_eq!(reputation.last_error_kind, Some(FailureKind::ServerError));
}

/// Stats list every registered provider in declaration order
#[test]
fn test_provider_stats_lists_registry() {
    let router = test_router();
    let stats = router.provider_stats();

    assert_eq!(stats.len(), 13);
    assert_eq!(stats[0].provider, "maersk");
    assert_eq!(stats[12].provider, "project44");
    assert!(stats.iter().all(|s| s.recent_failures == 0));
}

/// Ids outside the registry are tracked once reported
#[test]
fn test_unknown_provider_stats() {
    let router = test_router();
    assert!(router.provider_stats_including_unknown("test-provider").is_none());

    router.record_failure("test-provider", &timeout("test-provider"));
    router.record_failure("test-provider", &timeout("test-provider"));

    let stats = router
        .provider_stats_including_unknown("test-provider")
        .unwrap();
    assert_eq!(stats.recent_failures, 2);
    assert_eq!(stats.cost, None);
    assert_eq!(stats.reliability, None);

    assert!(router
        .provider_stats()
        .iter()
        .all(|s| s.provider != "test-provider"));
}

/// Registered providers have stats before any report
#[test]
fn test_registered_provider_stats_without_reports() {
    let router = test_router();
    let stats = router.provider_stats_including_unknown("shipsgo").unwrap();

    assert_eq!(stats.recent_failures, 0);
    assert_eq!(stats.cost, Some(0));
    assert!(stats.last_failure.is_none());
}

/// Recent failures push a provider down the order
#[test]
fn test_failures_demote_provider() {
    let router = test_router();
    let context = tier_context("UNKN1234567", UserTier::Enterprise);
    assert_top_choice(&router.analyze_routing(&context), "maersk");

    for _ in 0..3 {
        router.record_failure("maersk", &timeout("maersk"));
    }

    let decision = router.analyze_routing(&context);
    assert_top_choice(&decision, "project44");
    assert_eq!(decision.prioritized_providers.last().map(String::as_str), Some("maersk"));
}

/// The failure penalty is capped
#[test]
fn test_failure_penalty_capped() {
    let router = test_router();
    for _ in 0..20 {
        router.record_failure("msc", &timeout("msc"));
    }

    let explained = router.explain_routing(&container_context("UNKN1234567"));
    let msc = explained.iter().find(|s| s.provider == "msc").unwrap();
    assert_eq!(msc.recent_failures, 20);
    assert!((msc.breakdown.failure_penalty - 60.0).abs() < 1e-9);
}

/// Failures older than the window stop counting
#[test]
fn test_failures_expire_after_window() {
    let (router, clock) = router_with_clock(RoutingConfig::default());
    let context = tier_context("UNKN1234567", UserTier::Enterprise);
    let baseline = router.analyze_routing(&context);

    router.record_failure("maersk", &timeout("maersk"));
    router.record_failure("maersk", &timeout("maersk"));
    assert_ne!(router.analyze_routing(&context), baseline);

    clock.advance(Duration::minutes(30));
    assert_eq!(router.reputation().effective_failures("maersk", clock_now(&router)), 2);

    clock.advance(Duration::minutes(31));
    assert_eq!(router.reputation().effective_failures("maersk", clock_now(&router)), 0);
    assert_eq!(router.analyze_routing(&context), baseline);
}

fn clock_now(router: &Router) -> chrono::DateTime<chrono::Utc> {
    router.reputation().now()
}

/// Halving recovery forgives half of the failures
#[test]
fn test_halve_recovery() {
    let (router, _clock) = router_with_clock(config_with_recovery(RecoveryPolicy::Halve));

    for _ in 0..5 {
        router.record_failure("cosco", &timeout("cosco"));
    }
    router.record_success("cosco");
    assert_eq!(router.reputation().stats_of("cosco").recent_failures, 2);

    router.record_success("cosco");
    router.record_success("cosco");
    assert_eq!(router.reputation().stats_of("cosco").recent_failures, 0);
}

/// Decrement recovery forgives a fixed number of failures
#[test]
fn test_decrement_recovery() {
    let (router, _clock) =
        router_with_clock(config_with_recovery(RecoveryPolicy::Decrement { step: 2 }));

    for _ in 0..3 {
        router.record_failure("zim", &timeout("zim"));
    }
    router.record_success("zim");
    assert_eq!(router.reputation().stats_of("zim").recent_failures, 1);

    router.record_success("zim");
    assert_eq!(router.reputation().stats_of("zim").recent_failures, 0);
}

/// A shared store carries reputation between routers
#[test]
fn test_shared_reputation_store() {
    let reputation = Arc::new(ReputationTracker::default());
    let first = Router::builder().reputation(reputation.clone()).build();
    let second = Router::builder().reputation(reputation.clone()).build();

    first.record_failure("evergreen", &timeout("evergreen"));
    assert_eq!(
        second
            .provider_stats_including_unknown("evergreen")
            .unwrap()
            .recent_failures,
        1
    );
    assert_eq!(reputation.tracked_ids(), vec!["evergreen".to_string()]);
}

/// Reset clears history and every step is observed
#[test]
fn test_reset_and_events() {
    let observer = Arc::new(RecordingObserver::default());
    let router = Router::builder().observer(observer.clone()).build();

    router.record_failure("searates", &timeout("searates"));
    router.record_success("searates");
    router.reset_reputation();

    assert!(router.reputation().is_empty());
    assert!(router.provider_stats_including_unknown("test-provider").is_none());
    assert_eq!(observer.event_types(), vec!["failure", "success", "reset"]);

    let stats = router.stats();
    assert_eq!(stats.failures_reported, 1);
    assert_eq!(stats.successes_reported, 1);
    assert_eq!(stats.decisions, 0);
}

//! Concurrency integration tests
//!
//! The router is shared behind an `Arc` while many tasks route and report
//! outcomes at once.

use crate::fixtures::*;
use crate::helpers::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Concurrent failure reports are never lost
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_counted() {
    let router = Arc::new(test_router());
    let mut tasks = JoinSet::new();

    for _ in 0..16 {
        let router = Arc::clone(&router);
        tasks.spawn(async move {
            for _ in 0..25 {
                router.record_failure("msc", &timeout("msc"));
            }
        });
    }

    while let Some(result) = tasks.join_next().await {
        result.expect("task panicked");
    }

    let stats = router.provider_stats_including_unknown("msc").unwrap();
    assert_eq!(stats.recent_failures, 400);
    assert_eq!(router.stats().failures_reported, 400);
}

/// Routing and reporting interleave without corrupting state
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_routing_and_reporting() {
    let router = Arc::new(test_router());
    let mut tasks = JoinSet::new();

    for (i, (carrier, number)) in carrier_numbers().into_iter().enumerate() {
        let router = Arc::clone(&router);
        tasks.spawn(async move {
            let provider = format!("provider-{i}");
            for _ in 0..10 {
                router.record_failure(&provider, &timeout(&provider));
                let decision = router.analyze_routing(&container_context(number));
                assert_eq!(decision.suggested_carrier, Some(carrier));
                assert_eq!(decision.prioritized_providers.len(), 13);
            }
            router.record_success(&provider);
        });
    }

    while let Some(result) = tasks.join_next().await {
        result.expect("task panicked");
    }

    assert_eq!(router.stats().decisions, 90);
    assert_eq!(router.reputation().len(), 9);
    for i in 0..9 {
        let stats = router
            .provider_stats_including_unknown(&format!("provider-{i}"))
            .unwrap();
        assert_eq!(stats.recent_failures, 0);
        assert!(stats.last_success.is_some());
    }
}

/// Blocking threads can share the router as well
#[tokio::test]
async fn test_spawn_blocking_reports() {
    let router = Arc::new(test_router());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let router = Arc::clone(&router);
            tokio::task::spawn_blocking(move || {
                router.record_failure("cma-cgm", &server_error("cma-cgm"));
                router.record_success("shipsgo");
            })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task panicked");
    }

    assert_eq!(router.reputation().stats_of("cma-cgm").recent_failures, 8);
    assert_eq!(router.reputation().stats_of("shipsgo").total_successes, 8);
}

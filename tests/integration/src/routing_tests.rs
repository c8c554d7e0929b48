//! Routing integration tests
//!
//! Tests for carrier detection, strategy selection and provider ordering
//! through the public router API.

use crate::fixtures::*;
use crate::helpers::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tracking_core::{Carrier, FallbackStrategy, MatchKind, TrackingContext, TrackingType, UserTier};
use tracking_routing::{NoOpObserver, ProviderKind, ProviderProfile, ProviderRegistry, Router};

/// Every known owner prefix is detected and routed to its carrier first
#[test]
fn test_known_prefixes_route_to_carrier() {
    let router = test_router();

    for (carrier, number) in carrier_numbers() {
        let detected = router.detect_carrier(number);
        assert_eq!(detected.carrier, Some(carrier), "{number}");
        assert!(detected.confidence > 0.9, "{number}");
        assert_eq!(detected.kind, MatchKind::Exact);

        let decision = router.analyze_routing(&container_context(number));
        assert_eq!(decision.suggested_carrier, Some(carrier));
        assert_top_choice(&decision, carrier.id());
    }
}

/// Separators and lowercase input are normalized before matching
#[test]
fn test_formatted_number_detected() {
    let router = test_router();
    let decision = router.analyze_routing(&container_context("  maeu-123 4567 "));

    assert_eq!(decision.suggested_carrier, Some(Carrier::Maersk));
    assert_top_choice(&decision, "maersk");
}

/// A container-shaped number from an unknown owner is not suggested
#[test]
fn test_unknown_owner_code() {
    let router = test_router();
    let decision = router.analyze_routing(&container_context("UNKN1234567"));

    assert!(decision.confidence < 0.5);
    assert_eq!(decision.suggested_carrier, None);
    assert!(!decision.prioritized_providers.is_empty());
}

/// An abbreviation without the full prefix is a medium-confidence match
#[test]
fn test_abbreviation_only() {
    let router = test_router();
    let decision = router.analyze_routing(&container_context("MAE123456789"));

    assert!(decision.confidence > 0.5 && decision.confidence < 0.9);
    assert_eq!(decision.suggested_carrier, Some(Carrier::Maersk));
    assert_top_choice(&decision, "maersk");
}

/// Empty input still yields a usable decision
#[test]
fn test_empty_tracking_number() {
    let router = test_router();
    let decision = router.analyze_routing(&container_context(""));

    assert!(decision.confidence.abs() < f64::EPSILON);
    assert_eq!(decision.suggested_carrier, None);
    assert!(!decision.prioritized_providers.is_empty());
    assert!(decision.reasoning.contains("Top choice"));
}

/// Cost optimization and the free tier both put aggregators up front
#[test]
fn test_free_first_surfaces_free_providers() {
    let router = test_router();

    for context in [
        cost_context("MAEU1234567"),
        tier_context("MAEU1234567", UserTier::Free),
        cost_context("UNKN1234567"),
    ] {
        let decision = router.analyze_routing(&context);
        assert_eq!(decision.fallback_strategy, FallbackStrategy::FreeFirst);

        let first_five = &decision.prioritized_providers[..5];
        assert!(
            FREE_PROVIDERS
                .iter()
                .any(|free| first_five.iter().any(|p| p == free)),
            "no free provider in {first_five:?}"
        );
    }
}

/// Without a carrier match the cheapest aggregators lead under free_first
#[test]
fn test_free_first_without_match() {
    let router = test_router();
    let decision = router.analyze_routing(&cost_context("UNKN1234567"));

    assert_eq!(
        &decision.prioritized_providers[..3],
        &["shipsgo", "track-trace", "searates"]
    );
    assert!(decision.reasoning.contains("cost-effective"));
}

/// Enterprise callers and reliability optimization favour the carrier
#[test]
fn test_reliability_first_with_maersk_number() {
    let router = test_router();

    for context in [
        tier_context("MAEU1234567", UserTier::Enterprise),
        reliability_context("MAEU1234567"),
    ] {
        let decision = router.analyze_routing(&context);
        assert_eq!(decision.fallback_strategy, FallbackStrategy::ReliabilityFirst);
        assert_top_choice(&decision, "maersk");
    }
}

/// Reliability wins over cost when both flags are set
#[test]
fn test_reliability_flag_beats_cost_flag() {
    let router = test_router();
    let context = TrackingContext::builder()
        .tracking_number("MSCU1234567")
        .cost_optimization(true)
        .reliability_optimization(true)
        .user_tier(UserTier::Free)
        .build()
        .unwrap();

    let decision = router.analyze_routing(&context);
    assert_eq!(decision.fallback_strategy, FallbackStrategy::ReliabilityFirst);
    assert!(decision.reasoning.contains("Prioritizing reliability over cost"));
    assert!(decision.reasoning.contains("Prioritizing cost-effective providers"));
}

/// Premium callers never start with the free scraper
#[test]
fn test_premium_is_paid_first() {
    let router = test_router();

    for number in ["MAEU1234567", "UNKN1234567", ""] {
        let decision = router.analyze_routing(&tier_context(number, UserTier::Premium));
        assert_eq!(decision.fallback_strategy, FallbackStrategy::PaidFirst);
        assert_ne!(decision.top_choice(), "track-trace");
    }
}

/// No tier and no flags uses the configured default strategy
#[test]
fn test_default_strategy() {
    let router = test_router();
    let decision = router.analyze_routing(&container_context("UNKN1234567"));

    assert_eq!(decision.fallback_strategy, FallbackStrategy::PaidFirst);
    assert_top_choice(&decision, "maersk");
    assert_eq!(rank_of(&decision, "project44"), Some(1));
}

/// Bills of lading are only routed to providers that support them
#[test]
fn test_bol_restricted_providers() {
    let router = test_router();

    for number in ["MAEU1234567", "COSU1234567", "BOL-998877"] {
        let decision = router.analyze_routing(&bol_context(number));
        assert_eq!(decision.prioritized_providers.len(), BOL_PROVIDERS.len());
        for provider in &decision.prioritized_providers {
            assert!(BOL_PROVIDERS.contains(&provider.as_str()), "{provider}");
        }
        for free in FREE_PROVIDERS {
            assert_eq!(rank_of(&decision, free), None);
        }
    }
}

/// Booking lookups skip providers without booking support
#[test]
fn test_booking_candidates() {
    let router = test_router();
    let context = TrackingContext::new("HLXU1234567", TrackingType::Booking);
    let decision = router.analyze_routing(&context);

    assert_top_choice(&decision, "hapag-lloyd");
    assert_eq!(rank_of(&decision, "yang-ming"), None);
    assert_eq!(rank_of(&decision, "track-trace"), None);
    assert_eq!(decision.prioritized_providers.len(), 11);
}

/// A catalog without support for the requested type widens the candidates
#[test]
fn test_unsupported_type_widens_candidates() {
    let registry = ProviderRegistry::new(vec![
        ProviderProfile::carrier(Carrier::Zim, "ZIM", 30, 0.86, &[TrackingType::Container]),
        ProviderProfile::new(
            "shipsgo",
            "ShipsGo",
            ProviderKind::Aggregator,
            0,
            0.8,
            &[TrackingType::Container],
        ),
    ])
    .unwrap();

    let router = Router::builder()
        .registry(Arc::new(registry))
        .observer(Arc::new(NoOpObserver))
        .build();

    let decision = router.analyze_routing(&bol_context("ZIMU1234567"));
    assert_eq!(decision.prioritized_providers, vec!["zim", "shipsgo"]);
}

/// Providers the caller already tried move down and are named in the reasoning
#[test]
fn test_previous_failures_deprioritized() {
    let router = test_router();

    let baseline = router.analyze_routing(&container_context("UNKN1234567"));
    assert_top_choice(&baseline, "maersk");

    let decision =
        router.analyze_routing(&context_with_failures("UNKN1234567", &["maersk", "project44"]));
    assert!(rank_of(&decision, "maersk") > rank_of(&baseline, "maersk"));
    assert!(rank_of(&decision, "project44") > rank_of(&baseline, "project44"));
    assert!(decision.reasoning.contains("failed providers"));
}

/// Reasoning names unknown previously failed ids and the top choice
#[test]
fn test_reasoning_content() {
    let router = test_router();
    let decision = router.analyze_routing(&context_with_failures("ZIMU1234567", &["p1", "p2"]));

    assert!(decision.reasoning.contains("failed providers"));
    assert!(decision.reasoning.contains("p1"));
    assert!(decision.reasoning.contains("p2"));
    assert!(decision
        .reasoning
        .contains(&format!("Top choice: {}", decision.top_choice())));
    assert!(decision.reasoning.contains("Detected ZIM tracking number (95% confidence)"));
}

/// Repeated analysis without outcome reports gives identical decisions
#[test]
fn test_analysis_is_idempotent() {
    let router = test_router();
    let context = tier_context("EGLV1234567", UserTier::Premium);

    let first = router.analyze_routing(&context);
    let second = router.analyze_routing(&context);
    assert_eq!(first, second);
    assert_eq!(router.stats().decisions, 2);
}

/// The score breakdown agrees with the decision order
#[test]
fn test_explain_matches_decision() {
    let router = test_router();
    let context = cost_context("ONEU1234567");

    let decision = router.analyze_routing(&context);
    let explained = router.explain_routing(&context);

    let order: Vec<&str> = explained.iter().map(|s| s.provider.as_str()).collect();
    assert_eq!(order, decision.prioritized_providers);
    assert!(explained
        .windows(2)
        .all(|pair| pair[0].breakdown.total >= pair[1].breakdown.total));
    assert!(explained[0].breakdown.carrier_match > 0.0);
}

/// Decisions serialize with stable field names
#[test]
fn test_decision_json_shape() {
    let router = test_router();
    let decision = router.analyze_routing(&container_context("MAEU1234567"));

    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["suggested_carrier"], "maersk");
    assert_eq!(json["fallback_strategy"], "paid_first");
    assert_eq!(json["prioritized_providers"][0], "maersk");
}

/// Decisions are reported to the observer
#[test]
fn test_decision_event_emitted() {
    let observer = Arc::new(RecordingObserver::default());
    let router = Router::builder().observer(observer.clone()).build();

    router.analyze_routing(&container_context("CMAU1234567"));

    let events = observer.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        tracking_routing::RoutingEvent::Decision {
            top_choice,
            suggested_carrier,
            candidate_count,
            ..
        } => {
            assert_eq!(top_choice, "cma-cgm");
            assert_eq!(*suggested_carrier, Some(Carrier::CmaCgm));
            assert_eq!(*candidate_count, 13);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

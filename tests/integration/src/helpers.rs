//! Test helper utilities for integration tests

use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use tracking_config::RoutingConfig;
use tracking_core::RoutingDecision;
use tracking_routing::{DecisionObserver, ManualClock, NoOpObserver, Router, RoutingEvent};

/// Initialize tracing for tests (only once)
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

/// Initialize tracing for tests
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Router with the standard registry and default configuration
pub fn test_router() -> Router {
    init_tracing();
    Router::builder().observer(Arc::new(NoOpObserver)).build()
}

/// Router whose reputation store reads a manual clock
pub fn router_with_clock(config: RoutingConfig) -> (Router, Arc<ManualClock>) {
    init_tracing();
    let clock = Arc::new(ManualClock::default());
    let router = Router::builder()
        .config(config)
        .clock(clock.clone())
        .observer(Arc::new(NoOpObserver))
        .build();
    (router, clock)
}

/// Observer that keeps every event it sees
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RoutingEvent>>,
}

impl RecordingObserver {
    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<RoutingEvent> {
        self.events.lock().expect("observer lock poisoned").clone()
    }

    /// Recorded event types, in order
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(RoutingEvent::event_type).collect()
    }
}

impl DecisionObserver for RecordingObserver {
    fn observe(&self, event: &RoutingEvent) {
        self.events
            .lock()
            .expect("observer lock poisoned")
            .push(event.clone());
    }
}

/// Position of a provider in a decision, if present
pub fn rank_of(decision: &RoutingDecision, provider: &str) -> Option<usize> {
    decision
        .prioritized_providers
        .iter()
        .position(|p| p == provider)
}

/// Assert a decision routes to `provider` first
pub fn assert_top_choice(decision: &RoutingDecision, provider: &str) {
    assert_eq!(
        decision.top_choice(),
        provider,
        "expected {provider} first, got {:?}",
        decision.prioritized_providers
    );
}

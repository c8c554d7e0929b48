//! Per-provider failure reputation.
//!
//! Callers report the outcome of every provider query back to the router.
//! Failures lower a provider's standing for subsequent routing decisions;
//! successes restore it according to the configured recovery policy.
//! Entries are created lazily for any id, registered or not.

use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracking_config::{RecoveryPolicy, ReputationConfig};
use tracking_core::{FailureKind, ProviderFailure};

/// Accumulated outcome history of one provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReputation {
    /// Failures not yet offset by successes
    pub recent_failures: u32,
    /// Time of the last reported failure
    pub last_failure: Option<DateTime<Utc>>,
    /// Time of the last reported success
    pub last_success: Option<DateTime<Utc>>,
    /// Lifetime failure count
    pub total_failures: u64,
    /// Lifetime success count
    pub total_successes: u64,
    /// Category of the most recent failure
    pub last_error_kind: Option<FailureKind>,
}

impl ProviderReputation {
    /// Failures that still count against the provider at `now`.
    ///
    /// The counter is ignored once the last failure is older than `window`.
    #[must_use]
    pub fn effective_failures(&self, now: DateTime<Utc>, window: Duration) -> u32 {
        match self.last_failure {
            Some(last) if self.recent_failures > 0 => {
                // A failure stamped in the future counts as just happened.
                let recent = (now - last).to_std().map_or(true, |elapsed| elapsed <= window);
                if recent {
                    self.recent_failures
                } else {
                    0
                }
            }
            _ => 0,
        }
    }
}

/// Concurrent failure tracker keyed by provider id
#[derive(Debug)]
pub struct ReputationTracker {
    entries: DashMap<String, ProviderReputation>,
    recovery: RecoveryPolicy,
    failure_window: Duration,
    clock: Arc<dyn Clock>,
}

impl ReputationTracker {
    /// Create a tracker using wall-clock time
    #[must_use]
    pub fn new(config: &ReputationConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a tracker with an explicit time source
    #[must_use]
    pub fn with_clock(config: &ReputationConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            recovery: config.recovery,
            failure_window: config.failure_window,
            clock,
        }
    }

    /// Current time according to the tracker's clock
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Recovery policy applied on success
    #[must_use]
    pub fn recovery(&self) -> RecoveryPolicy {
        self.recovery
    }

    /// Window after which failures stop counting
    #[must_use]
    pub fn failure_window(&self) -> Duration {
        self.failure_window
    }

    /// Record a failed query. Returns the updated failure counter.
    pub fn record_failure(&self, provider_id: &str, failure: &ProviderFailure) -> u32 {
        let now = self.clock.now();
        let recent_failures = {
            let mut entry = self.entries.entry(provider_id.to_string()).or_default();
            entry.recent_failures = entry.recent_failures.saturating_add(1);
            entry.total_failures = entry.total_failures.saturating_add(1);
            entry.last_failure = Some(now);
            entry.last_error_kind = Some(failure.error_type);
            entry.recent_failures
        };

        if failure.provider != provider_id {
            debug!(
                provider = %provider_id,
                reported_provider = %failure.provider,
                "Failure report names a different provider, keyed by argument"
            );
        }

        warn!(
            provider = %provider_id,
            error_type = %failure.error_type,
            message = %failure.message,
            recent_failures,
            "Provider failure recorded"
        );

        recent_failures
    }

    /// Record a successful query. Returns the updated failure counter.
    pub fn record_success(&self, provider_id: &str) -> u32 {
        let now = self.clock.now();
        let (before, after) = {
            let mut entry = self.entries.entry(provider_id.to_string()).or_default();
            let before = entry.recent_failures;
            entry.recent_failures = self.recovery.apply(before);
            entry.total_successes = entry.total_successes.saturating_add(1);
            entry.last_success = Some(now);
            (before, entry.recent_failures)
        };

        if before > 0 {
            info!(
                provider = %provider_id,
                recovery = %self.recovery,
                recent_failures = after,
                "Provider recovering after success"
            );
        } else {
            debug!(provider = %provider_id, "Provider success recorded");
        }

        after
    }

    /// Reputation of a provider; zeroed if never reported
    #[must_use]
    pub fn stats_of(&self, provider_id: &str) -> ProviderReputation {
        self.stats_including_unknown(provider_id).unwrap_or_default()
    }

    /// Reputation of a provider, or `None` if it was never reported
    #[must_use]
    pub fn stats_including_unknown(&self, provider_id: &str) -> Option<ProviderReputation> {
        self.entries.get(provider_id).map(|entry| entry.value().clone())
    }

    /// Failures counting against a provider at `now`
    #[must_use]
    pub fn effective_failures(&self, provider_id: &str, now: DateTime<Utc>) -> u32 {
        self.entries
            .get(provider_id)
            .map_or(0, |entry| entry.effective_failures(now, self.failure_window))
    }

    /// Ids of every provider ever reported, sorted
    #[must_use]
    pub fn tracked_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Number of tracked providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no provider has been reported yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget all history
    pub fn reset(&self) {
        let cleared = self.entries.len();
        self.entries.clear();
        info!(cleared, "Provider reputation reset");
    }
}

impl Default for ReputationTracker {
    fn default() -> Self {
        Self::new(&ReputationConfig::default())
    }
}

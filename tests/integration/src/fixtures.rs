//! Test fixtures and sample data for integration tests

use tracking_core::{Carrier, FailureKind, ProviderFailure, TrackingContext, TrackingType, UserTier};

/// Free and near-free aggregators
pub const FREE_PROVIDERS: [&str; 3] = ["track-trace", "shipsgo", "searates"];

/// Providers able to track a bill of lading
pub const BOL_PROVIDERS: [&str; 4] = ["maersk", "msc", "cosco", "project44"];

/// One well-formed container number per carrier
pub fn carrier_numbers() -> Vec<(Carrier, &'static str)> {
    vec![
        (Carrier::Maersk, "MAEU1234567"),
        (Carrier::Msc, "MSCU1234567"),
        (Carrier::CmaCgm, "CMAU1234567"),
        (Carrier::Cosco, "COSU1234567"),
        (Carrier::HapagLloyd, "HLXU1234567"),
        (Carrier::Evergreen, "EGLV1234567"),
        (Carrier::OneLine, "ONEU1234567"),
        (Carrier::YangMing, "YMLU1234567"),
        (Carrier::Zim, "ZIMU1234567"),
    ]
}

/// Container context with no preferences
pub fn container_context(tracking_number: &str) -> TrackingContext {
    TrackingContext::new(tracking_number, TrackingType::Container)
}

/// Container context for a subscription tier
pub fn tier_context(tracking_number: &str, tier: UserTier) -> TrackingContext {
    TrackingContext::builder()
        .tracking_number(tracking_number)
        .user_tier(tier)
        .build()
        .expect("Failed to build context")
}

/// Container context asking for cheap providers
pub fn cost_context(tracking_number: &str) -> TrackingContext {
    TrackingContext::builder()
        .tracking_number(tracking_number)
        .cost_optimization(true)
        .build()
        .expect("Failed to build context")
}

/// Container context asking for reliable providers
pub fn reliability_context(tracking_number: &str) -> TrackingContext {
    TrackingContext::builder()
        .tracking_number(tracking_number)
        .reliability_optimization(true)
        .build()
        .expect("Failed to build context")
}

/// Context listing providers the caller already tried
pub fn context_with_failures(tracking_number: &str, failed: &[&str]) -> TrackingContext {
    TrackingContext::builder()
        .tracking_number(tracking_number)
        .previous_failures(failed.iter().copied())
        .build()
        .expect("Failed to build context")
}

/// Bill of lading context
pub fn bol_context(tracking_number: &str) -> TrackingContext {
    TrackingContext::new(tracking_number, TrackingType::Bol)
}

/// A timeout reported by a provider
pub fn timeout(provider: &str) -> ProviderFailure {
    ProviderFailure::timeout(provider)
}

/// A server error reported by a provider
pub fn server_error(provider: &str) -> ProviderFailure {
    ProviderFailure::new(provider, FailureKind::ServerError, "502 Bad Gateway")
}

//! Closed domain enums.
//!
//! Every value the router branches on is a closed enum so that strategy
//! selection and scoring are exhaustive. String forms match the wire names
//! callers already use (`free_first`, `cma-cgm`, `bol`, ...).

use crate::error::RoutingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of identifier being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackingType {
    /// ISO 6346 container number
    #[default]
    Container,
    /// Carrier booking reference
    Booking,
    /// Bill of lading number
    Bol,
}

impl TrackingType {
    /// All tracking types, in declaration order.
    pub const ALL: [Self; 3] = [Self::Container, Self::Booking, Self::Bol];

    /// Wire name of the tracking type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Booking => "booking",
            Self::Bol => "bol",
        }
    }

    /// Parse a tracking type, falling back to [`TrackingType::Container`].
    ///
    /// Container lookups are supported by every registered provider, so an
    /// unrecognized value degrades to the broadest provider set instead of
    /// failing the lookup.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %value, "Unknown tracking type, using container");
            Self::Container
        })
    }
}

impl fmt::Display for TrackingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackingType {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "container" => Ok(Self::Container),
            "booking" => Ok(Self::Booking),
            "bol" | "bl" | "bill_of_lading" | "bill-of-lading" => Ok(Self::Bol),
            _ => Err(RoutingError::InvalidTrackingType {
                value: s.to_string(),
            }),
        }
    }
}

/// Subscription tier of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserTier {
    /// Anonymous caller, no tier
    #[default]
    None,
    /// Free plan
    Free,
    /// Paid plan
    Premium,
    /// Enterprise contract
    Enterprise,
}

impl UserTier {
    /// Wire name of the tier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Free => "free",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for UserTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserTier {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(RoutingError::InvalidUserTier {
                value: s.to_string(),
            }),
        }
    }
}

/// Named policy controlling cost versus reliability in provider ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Prefer free and cheap providers
    FreeFirst,
    /// Prefer the most reliable providers regardless of cost
    ReliabilityFirst,
    /// Prefer paid providers, cost is close to neutral
    #[default]
    PaidFirst,
}

impl FallbackStrategy {
    /// Wire name of the strategy.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FreeFirst => "free_first",
            Self::ReliabilityFirst => "reliability_first",
            Self::PaidFirst => "paid_first",
        }
    }
}

impl fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FallbackStrategy {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "free_first" => Ok(Self::FreeFirst),
            "reliability_first" => Ok(Self::ReliabilityFirst),
            "paid_first" => Ok(Self::PaidFirst),
            _ => Err(RoutingError::InvalidStrategy {
                value: s.to_string(),
            }),
        }
    }
}

/// Ocean carrier that owns a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Carrier {
    /// A.P. Moller-Maersk
    Maersk,
    /// Mediterranean Shipping Company
    Msc,
    /// CMA CGM
    CmaCgm,
    /// COSCO Shipping
    Cosco,
    /// Hapag-Lloyd
    HapagLloyd,
    /// Evergreen Line
    Evergreen,
    /// Ocean Network Express
    OneLine,
    /// Yang Ming
    YangMing,
    /// ZIM
    Zim,
}

impl Carrier {
    /// All known carriers.
    pub const ALL: [Self; 9] = [
        Self::Maersk,
        Self::Msc,
        Self::CmaCgm,
        Self::Cosco,
        Self::HapagLloyd,
        Self::Evergreen,
        Self::OneLine,
        Self::YangMing,
        Self::Zim,
    ];

    /// Lowercase carrier id, also the id of the carrier's own provider.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Maersk => "maersk",
            Self::Msc => "msc",
            Self::CmaCgm => "cma-cgm",
            Self::Cosco => "cosco",
            Self::HapagLloyd => "hapag-lloyd",
            Self::Evergreen => "evergreen",
            Self::OneLine => "one-line",
            Self::YangMing => "yang-ming",
            Self::Zim => "zim",
        }
    }

    /// Uppercase form used in human-readable explanations.
    #[must_use]
    pub fn shouting_name(self) -> String {
        self.id().to_ascii_uppercase()
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Carrier {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.id() == needle)
            .ok_or_else(|| RoutingError::validation_field("carrier", format!("unknown carrier: {s}")))
    }
}

/// How a carrier was recognized in a tracking number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Full prefix + numeric suffix signature
    Exact,
    /// Only a carrier abbreviation at the start
    Heuristic,
    /// Nothing recognized
    None,
}

/// Category of a failed provider lookup, as reported by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Request timed out
    Timeout,
    /// Provider throttled the caller
    RateLimited,
    /// Provider has no record of the identifier
    NotFound,
    /// Credentials rejected
    Unauthorized,
    /// Provider returned a 5xx-class error
    ServerError,
    /// Connection-level failure
    Network,
    /// Response could not be understood
    InvalidResponse,
    /// Anything else
    #[default]
    Unknown,
}

impl FailureKind {
    /// All failure kinds.
    pub const ALL: [Self; 8] = [
        Self::Timeout,
        Self::RateLimited,
        Self::NotFound,
        Self::Unauthorized,
        Self::ServerError,
        Self::Network,
        Self::InvalidResponse,
        Self::Unknown,
    ];

    /// Wire name of the failure kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::ServerError => "server_error",
            Self::Network => "network",
            Self::InvalidResponse => "invalid_response",
            Self::Unknown => "unknown",
        }
    }

    /// Map a free-form error type reported by the caller.
    ///
    /// Callers report whatever their HTTP client produced, so this never
    /// fails; unrecognized values become [`FailureKind::Unknown`].
    #[must_use]
    pub fn from_reported(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "timeout" | "timed_out" => Self::Timeout,
            "rate_limited" | "rate_limit" | "429" => Self::RateLimited,
            "not_found" | "404" => Self::NotFound,
            "unauthorized" | "forbidden" | "401" | "403" => Self::Unauthorized,
            "server_error" | "500" | "502" | "503" | "504" => Self::ServerError,
            "network" | "connection" | "network_error" => Self::Network,
            "invalid_response" | "parse_error" => Self::InvalidResponse,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Static catalog of tracking providers.
//!
//! The table is fixed at construction and never mutated; routing reads it
//! concurrently without locking.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracking_core::{Carrier, RoutingError, RoutingResult, TrackingType};

/// What kind of data source a provider is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// A shipping line's own tracking API
    Carrier,
    /// Multi-carrier aggregator
    Aggregator,
    /// Visibility platform specialised in documents such as bills of lading
    Specialist,
}

impl ProviderKind {
    /// Wire name of the kind
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Carrier => "carrier",
            Self::Aggregator => "aggregator",
            Self::Specialist => "specialist",
        }
    }
}

/// Cost, reliability and capability metadata for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Provider id
    pub id: String,
    /// Name shown to humans
    pub display_name: String,
    /// Cost per lookup in cents
    pub base_cost_cents: u32,
    /// Historical success ratio in `[0, 1]`
    pub base_reliability: f64,
    /// Tracking types the provider can look up
    pub supported_types: BTreeSet<TrackingType>,
    /// Whether bill of lading lookups are supported
    pub supports_bol: bool,
    /// Source category
    pub kind: ProviderKind,
    /// Carrier this provider is the official source for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<Carrier>,
}

impl ProviderProfile {
    /// Profile for a carrier's own API. The provider id is the carrier id.
    #[must_use]
    pub fn carrier(
        carrier: Carrier,
        display_name: impl Into<String>,
        base_cost_cents: u32,
        base_reliability: f64,
        supported_types: &[TrackingType],
    ) -> Self {
        Self::new(
            carrier.id(),
            display_name,
            ProviderKind::Carrier,
            base_cost_cents,
            base_reliability,
            supported_types,
        )
        .with_carrier(carrier)
    }

    /// Profile for a non-carrier provider.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        kind: ProviderKind,
        base_cost_cents: u32,
        base_reliability: f64,
        supported_types: &[TrackingType],
    ) -> Self {
        let supported_types: BTreeSet<TrackingType> = supported_types.iter().copied().collect();
        Self {
            id: id.into(),
            display_name: display_name.into(),
            base_cost_cents,
            base_reliability: base_reliability.clamp(0.0, 1.0),
            supports_bol: supported_types.contains(&TrackingType::Bol),
            supported_types,
            kind,
            carrier: None,
        }
    }

    /// Mark the provider as the official source for a carrier
    #[must_use]
    pub fn with_carrier(mut self, carrier: Carrier) -> Self {
        self.carrier = Some(carrier);
        self
    }

    /// Whether this provider can look up the given tracking type
    #[must_use]
    pub fn supports(&self, tracking_type: TrackingType) -> bool {
        self.supported_types.contains(&tracking_type)
            && (tracking_type != TrackingType::Bol || self.supports_bol)
    }

    /// Whether lookups are free of charge
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.base_cost_cents == 0
    }
}

/// Read-only provider catalog, in declaration order
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    profiles: Vec<ProviderProfile>,
    index: HashMap<String, usize>,
}

impl ProviderRegistry {
    /// Build a registry from profiles.
    ///
    /// Declaration order is significant: it breaks score ties.
    ///
    /// # Errors
    /// Returns error if the table is empty, an id is blank or repeated, or
    /// a reliability is not finite
    pub fn new(profiles: Vec<ProviderProfile>) -> RoutingResult<Self> {
        if profiles.is_empty() {
            return Err(RoutingError::validation_field(
                "providers",
                "provider registry cannot be empty",
            ));
        }

        let mut index = HashMap::with_capacity(profiles.len());
        for (position, profile) in profiles.iter().enumerate() {
            if profile.id.trim().is_empty() {
                return Err(RoutingError::validation_field("id", "provider id cannot be blank"));
            }
            if !profile.base_reliability.is_finite() {
                return Err(RoutingError::validation_field(
                    "base_reliability",
                    format!("reliability of {} must be finite", profile.id),
                ));
            }
            if index.insert(profile.id.clone(), position).is_some() {
                return Err(RoutingError::validation_field(
                    "id",
                    format!("duplicate provider id: {}", profile.id),
                ));
            }
        }

        Ok(Self { profiles, index })
    }

    /// The standard catalog: nine carriers, three aggregators and one
    /// bill of lading specialist.
    #[must_use]
    pub fn standard() -> Self {
        use TrackingType::{Bol, Booking, Container};

        let profiles = vec![
            ProviderProfile::carrier(Carrier::Maersk, "Maersk", 50, 0.95, &[Container, Booking, Bol]),
            ProviderProfile::carrier(Carrier::Msc, "MSC", 45, 0.92, &[Container, Booking, Bol]),
            ProviderProfile::carrier(Carrier::CmaCgm, "CMA CGM", 40, 0.90, &[Container, Booking]),
            ProviderProfile::carrier(Carrier::Cosco, "COSCO Shipping", 35, 0.88, &[Container, Booking, Bol]),
            ProviderProfile::carrier(Carrier::HapagLloyd, "Hapag-Lloyd", 45, 0.91, &[Container, Booking]),
            ProviderProfile::carrier(Carrier::Evergreen, "Evergreen", 30, 0.87, &[Container, Booking]),
            ProviderProfile::carrier(Carrier::OneLine, "Ocean Network Express", 35, 0.89, &[Container, Booking]),
            ProviderProfile::carrier(Carrier::YangMing, "Yang Ming", 30, 0.85, &[Container]),
            ProviderProfile::carrier(Carrier::Zim, "ZIM", 30, 0.86, &[Container, Booking]),
            ProviderProfile::new("track-trace", "Track-Trace", ProviderKind::Aggregator, 0, 0.75, &[Container]),
            ProviderProfile::new("shipsgo", "ShipsGo", ProviderKind::Aggregator, 0, 0.80, &[Container, Booking]),
            ProviderProfile::new("searates", "SeaRates", ProviderKind::Aggregator, 5, 0.78, &[Container, Booking]),
            ProviderProfile::new("project44", "project44", ProviderKind::Specialist, 100, 0.97, &[Container, Booking, Bol]),
        ];

        let mut index = HashMap::with_capacity(profiles.len());
        for (position, profile) in profiles.iter().enumerate() {
            index.insert(profile.id.clone(), position);
        }

        Self { profiles, index }
    }

    /// Look up a provider by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ProviderProfile> {
        self.index.get(id).map(|&i| &self.profiles[i])
    }

    /// Whether the id is registered
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All profiles in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ProviderProfile> {
        self.profiles.iter()
    }

    /// All provider ids in declaration order
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.id.as_str()).collect()
    }

    /// Number of registered providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the registry is empty (never true for a constructed registry)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Providers able to look up the given type, in declaration order
    #[must_use]
    pub fn providers_supporting(&self, tracking_type: TrackingType) -> Vec<&ProviderProfile> {
        self.profiles
            .iter()
            .filter(|p| p.supports(tracking_type))
            .collect()
    }

    /// Routing candidates for a tracking type.
    ///
    /// Falls back to container-capable providers, then to every provider,
    /// when a custom catalog has nobody supporting the requested type.
    #[must_use]
    pub fn candidates_for(&self, tracking_type: TrackingType) -> Vec<&ProviderProfile> {
        let supporting = self.providers_supporting(tracking_type);
        if !supporting.is_empty() {
            return supporting;
        }

        tracing::warn!(
            tracking_type = %tracking_type,
            "No provider supports tracking type, widening candidate set"
        );

        let containers = self.providers_supporting(TrackingType::Container);
        if containers.is_empty() {
            self.profiles.iter().collect()
        } else {
            containers
        }
    }

    /// The official provider for a carrier, if registered
    #[must_use]
    pub fn provider_for_carrier(&self, carrier: Carrier) -> Option<&ProviderProfile> {
        self.profiles.iter().find(|p| p.carrier == Some(carrier))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

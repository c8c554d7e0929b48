//! Carrier detection from tracking-number formats.
//!
//! Numbers are normalized first (trimmed, spaces and dashes removed,
//! uppercased). An exact signature is a carrier's owner prefix followed by
//! six to twelve digits. A heuristic match only recognizes the carrier's
//! three-letter abbreviation at the start.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;
use tracking_config::PatternConfig;
use tracking_core::{Carrier, CarrierMatch};

struct CarrierSignature {
    carrier: Carrier,
    prefixes: &'static [&'static str],
    abbreviation: &'static str,
}

/// Checked in order; the first matching carrier wins.
const SIGNATURES: [CarrierSignature; 9] = [
    CarrierSignature { carrier: Carrier::Maersk, prefixes: &["MAEU", "MSKU"], abbreviation: "MAE" },
    CarrierSignature { carrier: Carrier::Msc, prefixes: &["MSCU", "MEDU"], abbreviation: "MSC" },
    CarrierSignature { carrier: Carrier::CmaCgm, prefixes: &["CMAU"], abbreviation: "CMA" },
    CarrierSignature { carrier: Carrier::Cosco, prefixes: &["COSU", "CSNU"], abbreviation: "COS" },
    CarrierSignature { carrier: Carrier::HapagLloyd, prefixes: &["HLXU", "HLCU"], abbreviation: "HLX" },
    CarrierSignature { carrier: Carrier::Evergreen, prefixes: &["EGLV", "EISU"], abbreviation: "EGL" },
    CarrierSignature { carrier: Carrier::OneLine, prefixes: &["ONEU", "ONEY"], abbreviation: "ONE" },
    CarrierSignature { carrier: Carrier::YangMing, prefixes: &["YMLU", "YMMU"], abbreviation: "YML" },
    CarrierSignature { carrier: Carrier::Zim, prefixes: &["ZIMU", "ZCSU"], abbreviation: "ZIM" },
];

#[allow(clippy::expect_used)]
static EXACT_PATTERNS: Lazy<Vec<(Carrier, Regex)>> = Lazy::new(|| {
    SIGNATURES
        .iter()
        .map(|sig| {
            let pattern = format!(r"^(?:{})\d{{6,12}}$", sig.prefixes.join("|"));
            let regex = Regex::new(&pattern).expect("carrier signature pattern is valid");
            (sig.carrier, regex)
        })
        .collect()
});

/// Four owner letters and seven digits, the shape of a container number.
#[allow(clippy::expect_used)]
static CONTAINER_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{4}\d{7}$").expect("container shape pattern is valid"));

/// Strip separators and uppercase a raw tracking number
#[must_use]
pub fn normalize(tracking_number: &str) -> String {
    tracking_number
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Detects the carrier a tracking number belongs to
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    config: PatternConfig,
}

impl PatternMatcher {
    /// Create a matcher with the given confidences
    #[must_use]
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Confidence below which a detected carrier is not suggested
    #[must_use]
    pub fn suggestion_threshold(&self) -> f64 {
        self.config.suggestion_threshold
    }

    /// Match a tracking number against the carrier signatures.
    ///
    /// Never fails: unrecognized input yields a match with no carrier.
    #[must_use]
    pub fn detect_carrier(&self, tracking_number: &str) -> CarrierMatch {
        let normalized = normalize(tracking_number);
        if normalized.is_empty() {
            return CarrierMatch::none(0.0);
        }

        if let Some((carrier, _)) = EXACT_PATTERNS.iter().find(|(_, re)| re.is_match(&normalized)) {
            trace!(carrier = %carrier, "Exact carrier signature matched");
            return CarrierMatch::exact(*carrier, self.config.exact_confidence);
        }

        if let Some(sig) = SIGNATURES
            .iter()
            .find(|sig| normalized.starts_with(sig.abbreviation))
        {
            trace!(carrier = %sig.carrier, "Carrier abbreviation matched");
            return CarrierMatch::heuristic(sig.carrier, self.config.heuristic_confidence);
        }

        if CONTAINER_SHAPE.is_match(&normalized) {
            CarrierMatch::none(self.config.plausible_confidence)
        } else {
            CarrierMatch::none(self.config.unrecognized_confidence)
        }
    }
}

//! Error types for the tracking router.
//!
//! Routing itself never fails: malformed tracking numbers degrade to low
//! confidence. These errors only surface at the boundary, when raw caller
//! input is parsed into the strongly-typed domain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for boundary operations
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Errors raised while turning caller input into domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingError {
    /// Unrecognized tracking type string.
    #[error("Invalid tracking type: {value} (expected container, booking or bol)")]
    InvalidTrackingType {
        /// The rejected input.
        value: String,
    },

    /// Unrecognized user tier string.
    #[error("Invalid user tier: {value} (expected none, free, premium or enterprise)")]
    InvalidUserTier {
        /// The rejected input.
        value: String,
    },

    /// Unrecognized fallback strategy string.
    #[error("Invalid fallback strategy: {value}")]
    InvalidStrategy {
        /// The rejected input.
        value: String,
    },

    /// Field-level validation failure.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
        /// Field that failed validation (if applicable).
        field: Option<String>,
    },

    /// Serialization or deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },
}

impl RoutingError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTrackingType { .. } => "INVALID_TRACKING_TYPE",
            Self::InvalidUserTier { .. } => "INVALID_USER_TIER",
            Self::InvalidStrategy { .. } => "INVALID_STRATEGY",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for RoutingError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for RoutingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors.field_errors().keys().next().map(ToString::to_string);
        Self::Validation {
            message: errors.to_string(),
            field,
        }
    }
}

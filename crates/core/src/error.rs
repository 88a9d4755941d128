//! Error types for ledger gateway operations.
//!
//! Provides typed errors for API communication, validation, persistence,
//! and configuration failures. Both gateway backends report through the
//! same taxonomy so callers can match on kind instead of parsing messages.

use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when talking to a ledger backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request was rejected with field-level validation problems.
    #[error("validation failed: {message}")]
    Validation {
        /// Human-readable summary from the backend.
        message: String,
        /// HTTP status code (400 or 422).
        status_code: u16,
        /// Per-field problem lists, keyed by field name.
        errors: HashMap<String, Vec<String>>,
    },

    /// Requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or rejected credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// API request failed with an uncategorized status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message from the API.
        message: String,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Durable storage read or write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a validation error with field-level problems.
    pub fn validation(
        status_code: u16,
        message: impl Into<String>,
        errors: HashMap<String, Vec<String>>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            status_code,
            errors,
        }
    }

    /// Creates a not-found error naming the missing record.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Returns the HTTP status code carried by the error, if any.
    ///
    /// Local-backend errors carry no status; only errors classified from an
    /// HTTP response report one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Validation { status_code, .. } | Self::Api { status_code, .. } => {
                Some(*status_code)
            }
            _ => None,
        }
    }

    /// Returns the per-field validation problems, if any.
    #[must_use]
    pub fn field_errors(&self) -> Option<&HashMap<String, Vec<String>>> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Returns true if the request itself was malformed.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if the target record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if credentials were missing or rejected.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Returns true if the failure came from the transport rather than the
    /// backend's decision.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

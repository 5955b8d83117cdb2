//! Error types for the Nook client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Nook client.
///
/// Variants follow the client's error taxonomy: transport failures,
/// authentication failures, invalid sessions, and business errors reported
/// by the backend envelope. Local concerns (storage, configuration,
/// decoding) get their own variants.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NookError {
    /// The request could not complete (connection refused, DNS, timeout...)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the credentials (HTTP 401) and no refresh applies
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials are gone; the client has been sent back to the login view
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Validation or business error reported by the backend
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Durable token storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied something unusable (bad callback URL, empty input...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NookError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Api error from a status code and display message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a transport failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if the backend refused the credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if the session was torn down and the user must log in again
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// Message suitable for showing to a user.
    ///
    /// Business errors already carry the backend's own message; transport
    /// errors collapse to a generic line.
    pub fn display_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Network(_) => "Unable to reach the server. Please try again.".to_string(),
            Self::SessionExpired(_) => "Your session has expired. Please log in again.".to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for NookError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for NookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("JSON - {}", err))
    }
}

impl From<toml::de::Error> for NookError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML - {}", err))
    }
}

impl From<toml::ser::Error> for NookError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(format!("TOML - {}", err))
    }
}

/// Conversion from anyhow::Error, used at the application boundary
impl From<anyhow::Error> for NookError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, NookError>`.
pub type Result<T> = std::result::Result<T, NookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_exposed_for_api_and_unauthorized() {
        assert_eq!(NookError::api(422, "bad").status(), Some(422));
        assert_eq!(NookError::Unauthorized("x".into()).status(), Some(401));
        assert_eq!(NookError::network("down").status(), None);
    }

    #[test]
    fn test_display_message_uses_backend_text() {
        let err = NookError::api(400, "Email already taken");
        assert_eq!(err.display_message(), "Email already taken");
        assert_eq!(err.to_string(), "Email already taken");
    }

    #[test]
    fn test_network_display_message_is_generic() {
        let err = NookError::network("connection refused (os error 111)");
        assert!(err.is_network());
        assert!(!err.display_message().contains("os error"));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: NookError = io.into();
        assert!(matches!(err, NookError::Storage(_)));
    }
}

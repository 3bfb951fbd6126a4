//! Domain error types
//!
//! This module defines the error hierarchy for Ledgerline. Errors carry their
//! cause up to the boundary that decides what the caller sees; third-party
//! error types are converted to strings at the adapter edge.

use thiserror::Error;

/// Main Ledgerline error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum LedgerlineError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors (malformed trigger payloads, bad identifiers)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The company named by a trigger could not be resolved
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    /// Document store errors
    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    /// Message bus errors
    #[error("Message bus error: {0}")]
    Bus(#[from] BusError),

    /// Object storage errors
    #[error("Object storage error: {0}")]
    Storage(String),

    /// Checkpoint state errors
    #[error("State management error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Document store errors
///
/// Errors raised while paging or fetching invoices and companies.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not obtain a connection
    #[error("Failed to connect to document store: {0}")]
    ConnectionFailed(String),

    /// Query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored document did not match the expected shape
    #[error("Invalid document {id}: {message}")]
    InvalidDocument { id: String, message: String },

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// Message bus errors
#[derive(Debug, Error)]
pub enum BusError {
    /// Could not reach the bus endpoint
    #[error("Failed to connect to message bus: {0}")]
    ConnectionFailed(String),

    /// The bus rejected the publish request
    #[error("Publish rejected: {status} - {message}")]
    PublishRejected { status: u16, message: String },

    /// The bus answered with something we could not interpret
    #[error("Invalid response from message bus: {0}")]
    InvalidResponse(String),

    /// No access token could be obtained for the bus
    #[error("Message bus authentication failed: {0}")]
    Authentication(String),

    /// Local consumer channel closed
    #[error("Message channel closed: {0}")]
    ChannelClosed(String),

    /// Publish failure injected or reported by an in-process bus
    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

impl From<std::io::Error> for LedgerlineError {
    fn from(err: std::io::Error) -> Self {
        LedgerlineError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerlineError {
    fn from(err: serde_json::Error) -> Self {
        LedgerlineError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerlineError {
    fn from(err: toml::de::Error) -> Self {
        LedgerlineError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<object_store::Error> for LedgerlineError {
    fn from(err: object_store::Error) -> Self {
        LedgerlineError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerlineError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");

        let err = LedgerlineError::CompanyNotFound("acme".to_string());
        assert_eq!(err.to_string(), "Company not found: acme");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::QueryFailed("timeout".to_string());
        let err: LedgerlineError = store_err.into();
        assert!(matches!(err, LedgerlineError::Store(_)));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_bus_error_conversion() {
        let bus_err = BusError::PublishRejected {
            status: 403,
            message: "permission denied".to_string(),
        };
        let err: LedgerlineError = bus_err.into();
        assert!(matches!(err, LedgerlineError::Bus(_)));
        assert_eq!(
            err.to_string(),
            "Message bus error: Publish rejected: 403 - permission denied"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: LedgerlineError = io_err.into();
        assert!(matches!(err, LedgerlineError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: LedgerlineError = json_err.into();
        assert!(matches!(err, LedgerlineError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: LedgerlineError = toml_err.into();
        assert!(matches!(err, LedgerlineError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = LedgerlineError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}

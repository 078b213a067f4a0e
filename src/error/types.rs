//! Error type definitions
//!
//! Defines the main error types used throughout the resolver service.

use thiserror::Error;

/// Main error type for link resolution
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A video identifier could not be extracted or transcoded
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A well-formed argument outside its accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Upstream metadata did not contain the requested resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream answered with a failure status or unusable payload
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The page body did not contain the embedded play address
    #[error("Pattern not found: {0}")]
    PatternNotFound(String),

    /// The embedded play address fragment was not valid JSON
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    /// The play address object lacked the expected media field
    #[error("Field not found: {field}")]
    FieldNotFound { field: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new invalid identifier error
    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new upstream error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create a new pattern not found error
    pub fn pattern_not_found(msg: impl Into<String>) -> Self {
        Self::PatternNotFound(msg.into())
    }

    /// Create a new malformed JSON error
    pub fn malformed_json(msg: impl Into<String>) -> Self {
        Self::MalformedJson(msg.into())
    }

    /// Create a field not found error
    pub fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::InvalidIdentifier(_) | Self::InvalidArgument(_)
        )
    }
}

//! Error types for the D-Day core library

use thiserror::Error;

/// Result type alias for D-Day operations
pub type Result<T> = std::result::Result<T, DDayError>;

/// Main error type for D-Day operations
#[derive(Error, Debug)]
pub enum DDayError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("D-Day not found: {id}")]
    NotFound { id: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DDayError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error for the given record id
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error means the record does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

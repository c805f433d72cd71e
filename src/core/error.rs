//! Custom error types for the storefront core

use thiserror::Error;

/// Main error type for the storefront core
#[derive(Error, Debug)]
pub enum Error {
    /// Required input was missing or blank; the user can correct it and retry
    #[error("Validation failed: {message}")]
    Validation {
        /// User-facing description of the problem
        message: String,
        /// Names of the offending fields
        fields: Vec<&'static str>,
    },

    /// Operation not permitted in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The order placement backend reported a failure
    #[error("Order placement failed: {0}")]
    Placement(String),

    /// Invalid data or parameter
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization or deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    /// Returns true for errors the user can fix by editing their input
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::Placement(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

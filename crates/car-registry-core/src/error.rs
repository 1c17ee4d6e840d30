//! Error types for the car registry.
//!
//! The taxonomy is deliberately small: a lookup miss, a handful of client
//! errors for bad request bodies, and a poisoned lock.

use thiserror::Error;

/// Main error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Car not found")]
    CarNotFound { id: i64 },

    #[error("All fields required: make, model, year, color, price")]
    MissingFields,

    #[error("No data provided")]
    NoDataProvided,

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid JSON body: {message}")]
    InvalidBody { message: String },

    #[error("Car store lock poisoned")]
    Lock,
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::InvalidBody {
            message: err.to_string(),
        }
    }
}

impl RegistryError {
    /// Create an invalid-field error for `field`.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        RegistryError::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Map this error to an HTTP status code.
    ///
    /// - 404: the requested car does not exist
    /// - 400: the request body was missing, empty, or malformed
    /// - 500: internal failures
    pub fn status_code(&self) -> u16 {
        match self {
            RegistryError::CarNotFound { .. } => 404,

            RegistryError::MissingFields
            | RegistryError::NoDataProvided
            | RegistryError::InvalidField { .. }
            | RegistryError::InvalidBody { .. } => 400,

            RegistryError::Lock => 500,
        }
    }

    /// Whether the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

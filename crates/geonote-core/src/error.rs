//! Error types for geonotes.

use std::time::Duration;

use thiserror::Error;

use crate::validator::ValidationErrors;

/// Result type alias using geonotes' Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for geonotes operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store call exceeded its deadline
    #[error("Store operation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// One or more note fields failed validation
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the caller can fix this by changing its input.
    ///
    /// Everything else is a store-side failure and should be reported opaquely.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::InvalidInput(_))
    }
}

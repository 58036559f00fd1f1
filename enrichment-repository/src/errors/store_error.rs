//! Store error types.
//!
//! This module defines the error types that can occur while reading entities
//! from the source table or writing records to the target table.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to reach the store.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A row with the same identity already exists.
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// The store returned a non-success status.
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Failed to parse a store response.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The client could not be configured.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a duplicate record error.
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Create an API error.
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: msg.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the error is the store's uniqueness backstop firing.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Determine if an error is retryable (transient failures).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) => true,
            Self::ApiError { status, .. } => *status == 429 || *status >= 500,
            Self::Duplicate(_) | Self::ParseError(_) | Self::ConfigError(_) => false,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::parse(err.to_string())
        } else if err.is_builder() {
            Self::config(err.to_string())
        } else {
            Self::connection(err.to_string())
        }
    }
}

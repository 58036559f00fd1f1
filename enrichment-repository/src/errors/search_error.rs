//! Search provider error types.
//!
//! This module defines the error types that can occur while querying the
//! external search provider.

use thiserror::Error;

/// Errors that can occur during search provider operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The provider signalled a rate limit (HTTP 429).
    #[error("Rate limited by search provider")]
    Throttled,

    /// The request did not complete within the per-call timeout.
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// Connection or other transport-level failure.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The provider returned a non-success status other than 429.
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Failed to parse the provider response.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The client could not be configured.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SearchError {
    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::TimeoutError(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
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

    /// Whether the provider asked us to slow down.
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled)
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if err.is_decode() {
            Self::parse(err.to_string())
        } else if err.is_builder() {
            Self::config(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

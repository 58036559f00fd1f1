//! # Enricher
//!
//! Main library for the resumable reference enricher.
//!
//! This crate provides the entry point, configuration, and logging setup for
//! running the enrichment pipeline.

pub mod config;
pub mod logging;

pub use config::{Dependencies, EnricherConfig};

use thiserror::Error;

/// Errors that can occur during enricher initialization or execution.
#[derive(Error, Debug)]
pub enum EnricherError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] enrichment_pipeline::PipelineError),

    /// Search client error.
    #[error("Search error: {0}")]
    SearchError(#[from] enrichment_repository::SearchError),

    /// Store client error.
    #[error("Store error: {0}")]
    StoreError(#[from] enrichment_repository::StoreError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EnricherError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

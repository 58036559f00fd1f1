//! Semantic Scholar implementation of the search provider.
//!
//! This module provides a concrete implementation of `SearchProvider`
//! backed by the Semantic Scholar Graph API paper search endpoint.

mod client;
mod config;

pub use client::SemanticScholarClient;
pub use config::SemanticScholarConfig;

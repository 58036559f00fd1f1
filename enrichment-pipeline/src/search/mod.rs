//! Search module for the enrichment pipeline.
//!
//! Issues one paced query per entity and absorbs provider failures.

mod search_client;

pub use search_client::{backoff_delay, SearchClient, SearchClientConfig};

//! Search provider trait definition.

use async_trait::async_trait;

use crate::errors::SearchError;
use enrichment_shared::RawDocument;

/// A single query against the search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Maximum number of documents to return.
    pub limit: usize,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        Self {
            query: query.into(),
            limit,
        }
    }
}

/// Abstract interface for the external document search API.
///
/// Implementations perform exactly one request per call. Retrying, backoff
/// and pacing are the caller's concern.
///
/// # Error Handling
///
/// A rate-limit response must surface as [`SearchError::Throttled`] so the
/// caller can apply its backoff schedule. An empty result set is `Ok(vec![])`,
/// not an error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Execute a search query.
    ///
    /// # Arguments
    ///
    /// * `request` - Query text and result limit
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RawDocument>)` - Ranked documents, possibly empty
    /// * `Err(SearchError)` - Throttle, timeout, transport or API failure
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawDocument>, SearchError>;
}

//! Configuration for the Semantic Scholar client.

use std::time::Duration;

/// Default paper search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";

/// Fields requested for every document.
pub const DEFAULT_FIELDS: &str = "title,authors,year,venue,externalIds,url,abstract,publicationDate";

/// Configuration for the Semantic Scholar client.
#[derive(Debug, Clone)]
pub struct SemanticScholarConfig {
    /// Paper search endpoint.
    pub base_url: String,
    /// Optional API key, sent as `x-api-key` for higher rate limits.
    pub api_key: Option<String>,
    /// Comma-separated list of document fields to request.
    pub fields: String,
    /// Per-call timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for SemanticScholarConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            api_key: None,
            fields: DEFAULT_FIELDS.to_string(),
            timeout: Duration::from_secs(15),
            user_agent: format!("reference-enricher/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SemanticScholarConfig {
    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the search endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

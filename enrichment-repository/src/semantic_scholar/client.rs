//! Semantic Scholar client implementation.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::{SearchProvider, SearchRequest};
use crate::semantic_scholar::config::SemanticScholarConfig;
use enrichment_shared::RawDocument;

/// Body of a paper search response.
#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    data: Option<Vec<RawDocument>>,
}

/// Semantic Scholar paper search client.
///
/// Performs a single `GET` per call; throttling is reported as
/// [`SearchError::Throttled`] and left to the caller.
///
/// # Example
///
/// ```ignore
/// let config = SemanticScholarConfig::default().with_api_key("...");
/// let client = SemanticScholarClient::new(config)?;
/// let docs = client.search(&SearchRequest::new("niacinamide skin", 4)).await?;
/// ```
pub struct SemanticScholarClient {
    http: reqwest::Client,
    config: SemanticScholarConfig,
}

impl SemanticScholarClient {
    /// Create a new client.
    ///
    /// # Returns
    ///
    /// * `Ok(SemanticScholarClient)` - A new client instance
    /// * `Err(SearchError)` - If the endpoint URL is invalid or the HTTP
    ///   client cannot be built
    pub fn new(config: SemanticScholarConfig) -> Result<Self, SearchError> {
        Url::parse(&config.base_url)
            .map_err(|e| SearchError::config(format!("Invalid search URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::config(e.to_string()))?;

        info!(
            url = %config.base_url,
            authenticated = config.api_key.is_some(),
            timeout_secs = config.timeout.as_secs(),
            "Created Semantic Scholar client"
        );

        Ok(Self { http, config })
    }
}

#[async_trait]
impl SearchProvider for SemanticScholarClient {
    #[instrument(skip(self), fields(query = %request.query))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawDocument>, SearchError> {
        let limit = request.limit.to_string();
        let mut builder = self.http.get(&self.config.base_url).query(&[
            ("query", request.query.as_str()),
            ("limit", limit.as_str()),
            ("fields", self.config.fields.as_str()),
        ]);

        if let Some(ref api_key) = self.config.api_key {
            builder = builder.header("x-api-key", api_key);
        }

        let response = check_response(builder.send().await?).await?;
        let body: SearchResponseBody = response.json().await?;
        let documents = body.data.unwrap_or_default();

        debug!(count = documents.len(), "Search returned documents");
        Ok(documents)
    }
}

/// Map the response status onto the search error taxonomy.
///
/// - **429** → [`SearchError::Throttled`]; no `Retry-After` is assumed.
/// - **Non-success** → [`SearchError::ApiError`] with the response body.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, SearchError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(SearchError::Throttled);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Search request failed");
        return Err(SearchError::api(status.as_u16(), body));
    }
    Ok(response)
}

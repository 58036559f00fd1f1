//! Search client implementation.
//!
//! Wraps a [`SearchProvider`] with query construction, throttle backoff and
//! fixed inter-request spacing. Every failure mode degrades to an empty
//! result for the entity; the job never aborts because of the provider.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use enrichment_repository::{SearchError, SearchProvider, SearchRequest};
use enrichment_shared::RawDocument;

/// Configuration for the search client.
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    /// Maximum number of documents kept per entity.
    pub results_per_entity: usize,
    /// Fixed domain qualifier appended to every query.
    pub query_qualifier: String,
    /// Base wait after a throttle response; attempt `n` waits `n * base`.
    pub throttle_base_wait: Duration,
    /// Maximum number of backoff waits before giving up on an entity.
    pub max_throttle_retries: u32,
    /// Minimum spacing between consecutive provider calls.
    pub request_spacing: Duration,
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            results_per_entity: 4,
            query_qualifier: "skin".to_string(),
            throttle_base_wait: Duration::from_secs(120),
            max_throttle_retries: 3,
            request_spacing: Duration::from_secs(3),
        }
    }
}

/// Wait before retry `attempt` (1-based) after a throttle response.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * attempt
}

/// Paced, throttle-aware search client.
pub struct SearchClient {
    provider: Arc<dyn SearchProvider>,
    config: SearchClientConfig,
    last_request: Option<Instant>,
}

impl SearchClient {
    /// Create a new search client with default configuration.
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self::with_config(provider, SearchClientConfig::default())
    }

    /// Create a new search client with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchProvider>, config: SearchClientConfig) -> Self {
        Self {
            provider,
            config,
            last_request: None,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchClientConfig {
        &self.config
    }

    /// Build the provider query for an entity.
    pub fn query_for(&self, entity_name: &str) -> String {
        let entity = entity_name.trim().to_lowercase();
        let qualifier = self.config.query_qualifier.trim();
        if qualifier.is_empty() {
            entity
        } else {
            format!("{} {}", entity, qualifier)
        }
    }

    /// Search for documents about an entity.
    ///
    /// Returns at most `results_per_entity` documents. Throttling is retried
    /// on the backoff schedule; timeouts and other failures are not retried.
    /// In every failure case the result is empty.
    #[instrument(skip(self))]
    pub async fn search(&mut self, entity_name: &str) -> Vec<RawDocument> {
        let request = SearchRequest::new(self.query_for(entity_name), self.config.results_per_entity);
        let mut throttled = 0u32;

        loop {
            self.pace().await;
            let result = self.provider.search(&request).await;
            self.last_request = Some(Instant::now());

            match result {
                Ok(mut documents) => {
                    documents.truncate(self.config.results_per_entity);
                    debug!(count = documents.len(), "Search succeeded");
                    return documents;
                }
                Err(SearchError::Throttled) => {
                    if throttled >= self.config.max_throttle_retries {
                        warn!(
                            attempts = throttled + 1,
                            entity = %entity_name,
                            "Rate limited repeatedly, skipping entity"
                        );
                        return Vec::new();
                    }
                    throttled += 1;
                    let wait = backoff_delay(self.config.throttle_base_wait, throttled);
                    warn!(
                        attempt = throttled,
                        max_retries = self.config.max_throttle_retries,
                        wait_secs = wait.as_secs(),
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(wait).await;
                    info!(attempt = throttled, "Retrying after backoff");
                }
                Err(SearchError::TimeoutError(e)) => {
                    warn!(entity = %entity_name, error = %e, "Timeout searching");
                    return Vec::new();
                }
                Err(e) => {
                    warn!(entity = %entity_name, error = %e, "Error searching");
                    return Vec::new();
                }
            }
        }
    }

    /// Hold the next call until `request_spacing` has passed since the last.
    async fn pace(&self) {
        if let Some(last) = self.last_request {
            tokio::time::sleep_until(last + self.config.request_spacing).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock provider replaying scripted responses and recording call times.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<Vec<RawDocument>, SearchError>>>,
        calls: Mutex<Vec<(Instant, SearchRequest)>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<Vec<RawDocument>, SearchError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedProvider {
        async fn search(&self, request: &SearchRequest) -> Result<Vec<RawDocument>, SearchError> {
            self.calls
                .lock()
                .unwrap()
                .push((Instant::now(), request.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn docs(n: usize) -> Vec<RawDocument> {
        (0..n).map(|i| RawDocument::titled(format!("Paper {}", i))).collect()
    }

    #[test]
    fn test_backoff_schedule_is_linear_in_attempt() {
        let base = Duration::from_secs(120);
        assert_eq!(backoff_delay(base, 1), Duration::from_secs(120));
        assert_eq!(backoff_delay(base, 2), Duration::from_secs(240));
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(360));
    }

    #[test]
    fn test_query_is_lowercased_with_qualifier() {
        let client = SearchClient::new(ScriptedProvider::new(vec![]));
        assert_eq!(client.query_for("Hyaluronic Acid"), "hyaluronic acid skin");

        let bare = SearchClient::with_config(
            ScriptedProvider::new(vec![]),
            SearchClientConfig {
                query_qualifier: String::new(),
                ..Default::default()
            },
        );
        assert_eq!(bare.query_for("Retinol"), "retinol");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_bounded_documents() {
        let provider = ScriptedProvider::new(vec![Ok(docs(6))]);
        let mut client = SearchClient::new(provider.clone());

        let result = client.search("Niacinamide").await;
        assert_eq!(result.len(), 4);

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, SearchRequest::new("niacinamide skin", 4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_backoff_then_give_up() {
        let provider = ScriptedProvider::new(vec![
            Err(SearchError::Throttled),
            Err(SearchError::Throttled),
            Err(SearchError::Throttled),
            Err(SearchError::Throttled),
        ]);
        let mut client = SearchClient::new(provider.clone());

        let result = client.search("Retinol").await;
        assert!(result.is_empty());

        let times = provider.call_times();
        assert_eq!(times.len(), 4);
        assert_eq!(times[1] - times[0], Duration::from_secs(120));
        assert_eq!(times[2] - times[1], Duration::from_secs(240));
        assert_eq!(times[3] - times[2], Duration::from_secs(360));
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_then_success() {
        let provider = ScriptedProvider::new(vec![Err(SearchError::Throttled), Ok(docs(2))]);
        let mut client = SearchClient::new(provider.clone());

        let result = client.search("Retinol").await;
        assert_eq!(result.len(), 2);
        assert_eq!(provider.call_times().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_not_retried() {
        let provider = ScriptedProvider::new(vec![
            Err(SearchError::timeout("operation timed out")),
            Ok(docs(2)),
        ]);
        let mut client = SearchClient::new(provider.clone());

        assert!(client.search("Retinol").await.is_empty());
        assert_eq!(provider.call_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_and_api_errors_yield_empty() {
        let provider = ScriptedProvider::new(vec![
            Err(SearchError::transport("connection reset")),
            Err(SearchError::api(500, "internal")),
        ]);
        let mut client = SearchClient::new(provider.clone());

        assert!(client.search("A").await.is_empty());
        assert!(client.search("B").await.is_empty());
        assert_eq!(provider.call_times().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_spaced() {
        let provider = ScriptedProvider::new(vec![
            Ok(docs(1)),
            Err(SearchError::transport("down")),
            Ok(docs(1)),
        ]);
        let mut client = SearchClient::new(provider.clone());

        let start = Instant::now();
        client.search("A").await;
        client.search("B").await;
        client.search("C").await;

        let times = provider.call_times();
        assert_eq!(times[0], start);
        assert_eq!(times[1] - times[0], Duration::from_secs(3));
        assert_eq!(times[2] - times[1], Duration::from_secs(3));
    }
}

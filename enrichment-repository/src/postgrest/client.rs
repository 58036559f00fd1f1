//! PostgREST client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::errors::StoreError;
use crate::interfaces::{EntitySource, RecordStore};
use crate::postgrest::config::PostgrestConfig;
use crate::postgrest::rows::{entity_names, record_row};
use enrichment_shared::EnrichmentRecord;

/// PostgREST (Supabase) client.
///
/// Serves the entity source reads and the record store writes over the same
/// authenticated HTTP client.
pub struct PostgrestClient {
    http: reqwest::Client,
    config: PostgrestConfig,
}

impl PostgrestClient {
    /// Create a new PostgREST client.
    ///
    /// # Returns
    ///
    /// * `Ok(PostgrestClient)` - A new client instance
    /// * `Err(StoreError)` - If the URL or key is invalid, or the HTTP client
    ///   cannot be built
    pub fn new(config: PostgrestConfig) -> Result<Self, StoreError> {
        Url::parse(&config.base_url)
            .map_err(|e| StoreError::config(format!("Invalid store URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| StoreError::config(format!("Invalid API key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| StoreError::config(format!("Invalid API key: {}", e)))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::config(e.to_string()))?;

        info!(
            url = %config.base_url,
            source_table = %config.source_table,
            target_table = %config.target_table,
            "Created PostgREST client"
        );

        Ok(Self { http, config })
    }

    /// Read one page of the source table without retrying.
    async fn fetch_page_once(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Option<String>>, StoreError> {
        let response = self
            .http
            .get(self.config.table_url(&self.config.source_table))
            .query(&[
                ("select", self.config.source_column.clone()),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::api(status.as_u16(), body));
        }

        let rows: Vec<Map<String, Value>> = response.json().await?;
        Ok(entity_names(rows, &self.config.source_column))
    }
}

#[async_trait]
impl EntitySource for PostgrestClient {
    /// Read one page of entity names, retrying transient failures with
    /// exponential backoff.
    #[instrument(skip(self))]
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Option<String>>, StoreError> {
        let mut delay_ms = self.config.initial_retry_delay_ms;
        let mut attempt = 0;

        loop {
            match self.fetch_page_once(offset, limit).await {
                Ok(rows) => {
                    if attempt > 0 {
                        info!(attempt = attempt, offset = offset, "Page read succeeded after retry");
                    }
                    return Ok(rows);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt = attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Page read failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = std::cmp::min(delay_ms * 2, self.config.max_retry_delay_ms);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl RecordStore for PostgrestClient {
    async fn exists(&self, entity_name: &str, title: &str) -> Result<bool, StoreError> {
        let response = self
            .http
            .get(self.config.table_url(&self.config.target_table))
            .query(&[
                (self.config.entity_column.as_str(), format!("eq.{}", entity_name)),
                ("title", format!("eq.{}", title)),
                ("select", "id".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::api(status.as_u16(), body));
        }

        let rows: Vec<Value> = response.json().await?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, record: &EnrichmentRecord) -> Result<(), StoreError> {
        let row = record_row(record, &self.config.entity_column)?;

        let response = self
            .http
            .post(self.config.table_url(&self.config.target_table))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;

        check_insert_response(response).await?;
        debug!(entity = %record.entity_name, "Inserted record");
        Ok(())
    }
}

/// Classify an insert response.
///
/// 200/201 are success; 409 is the uniqueness backstop firing and maps to
/// [`StoreError::Duplicate`].
async fn check_insert_response(response: reqwest::Response) -> Result<(), StoreError> {
    let status = response.status();
    match status {
        StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
        StatusCode::CONFLICT => {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::duplicate(body))
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::api(status.as_u16(), body))
        }
    }
}

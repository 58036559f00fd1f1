//! Configuration for the PostgREST client.

use std::time::Duration;

/// Configuration for the PostgREST client.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project base URL (e.g. `https://xyz.supabase.co`).
    pub base_url: String,
    /// Service key, sent both as `apikey` and as a bearer token.
    pub api_key: String,
    /// Table holding the entity names.
    pub source_table: String,
    /// Column holding the entity name in the source table.
    pub source_column: String,
    /// Table receiving enrichment records.
    pub target_table: String,
    /// Column holding the entity name in the target table.
    pub entity_column: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum number of retry attempts for transient page read failures.
    pub max_retries: u32,
    /// Initial retry delay in milliseconds.
    pub initial_retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds.
    pub max_retry_delay_ms: u64,
}

impl PostgrestConfig {
    /// Create a config for the given project with default table names.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            source_table: "sss_ingredients".to_string(),
            source_column: "ingredient_name".to_string(),
            target_table: "papers".to_string(),
            entity_column: "ingredient_name".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_retry_delay_ms: 500,
            max_retry_delay_ms: 5000,
        }
    }

    /// REST endpoint for a table.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let config = PostgrestConfig::new("https://example.supabase.co/", "key");
        assert_eq!(
            config.table_url("papers"),
            "https://example.supabase.co/rest/v1/papers"
        );
    }
}

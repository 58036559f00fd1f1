//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::EnricherError;
use enrichment_pipeline::{OrchestratorConfig, SearchClientConfig};
use enrichment_repository::{PostgrestConfig, SemanticScholarConfig};

const DEFAULT_SOURCE_TABLE: &str = "sss_ingredients";
const DEFAULT_SOURCE_COLUMN: &str = "ingredient_name";
const DEFAULT_TARGET_TABLE: &str = "papers";
const DEFAULT_CHECKPOINT_FILE: &str = "checkpoint.json";
const DEFAULT_LOG_FILE: &str = "enricher.log";
const DEFAULT_BATCH_SIZE: usize = 100;
const DEFAULT_RESULTS_PER_ENTITY: usize = 4;
const DEFAULT_REQUEST_DELAY_SECS: u64 = 3;
const DEFAULT_QUERY_QUALIFIER: &str = "skin";

/// Resolved enricher configuration.
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub semantic_scholar_key: Option<String>,
    pub semantic_scholar_url: String,
    pub source_table: String,
    /// Entity column, shared by the source and the record table.
    pub source_column: String,
    pub target_table: String,
    pub checkpoint_file: PathBuf,
    pub log_file: PathBuf,
    pub batch_size: usize,
    pub results_per_entity: usize,
    pub request_delay: Duration,
    pub query_qualifier: String,
}

impl EnricherConfig {
    /// Read the configuration from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SUPABASE_URL`: PostgREST project URL (required)
    /// - `SUPABASE_SERVICE_KEY`: service key (required)
    /// - `SEMANTIC_SCHOLAR_KEY`: optional provider API key
    /// - `SEMANTIC_SCHOLAR_URL`: search endpoint
    /// - `ENRICHER_SOURCE_TABLE` (default: sss_ingredients)
    /// - `ENRICHER_SOURCE_COLUMN` (default: ingredient_name)
    /// - `ENRICHER_TARGET_TABLE` (default: papers)
    /// - `ENRICHER_CHECKPOINT_FILE` (default: checkpoint.json)
    /// - `ENRICHER_LOG_FILE` (default: enricher.log)
    /// - `ENRICHER_BATCH_SIZE` (default: 100)
    /// - `ENRICHER_RESULTS_PER_ENTITY` (default: 4)
    /// - `ENRICHER_REQUEST_DELAY_SECS` (default: 3)
    /// - `ENRICHER_QUERY_QUALIFIER` (default: skin)
    pub fn from_env() -> Result<Self, EnricherError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EnricherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let supabase_url = get("SUPABASE_URL")
            .ok_or_else(|| EnricherError::config("SUPABASE_URL is not set"))?;
        let supabase_service_key = get("SUPABASE_SERVICE_KEY")
            .ok_or_else(|| EnricherError::config("SUPABASE_SERVICE_KEY is not set"))?;

        let batch_size = parse_positive(get("ENRICHER_BATCH_SIZE"), "ENRICHER_BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        let results_per_entity = parse_positive(
            get("ENRICHER_RESULTS_PER_ENTITY"),
            "ENRICHER_RESULTS_PER_ENTITY",
            DEFAULT_RESULTS_PER_ENTITY,
        )?;
        let request_delay_secs = parse_or(
            get("ENRICHER_REQUEST_DELAY_SECS"),
            "ENRICHER_REQUEST_DELAY_SECS",
            DEFAULT_REQUEST_DELAY_SECS,
        )?;

        Ok(Self {
            supabase_url,
            supabase_service_key,
            semantic_scholar_key: get("SEMANTIC_SCHOLAR_KEY"),
            semantic_scholar_url: get("SEMANTIC_SCHOLAR_URL")
                .unwrap_or_else(|| SemanticScholarConfig::default().base_url),
            source_table: or_default("ENRICHER_SOURCE_TABLE", DEFAULT_SOURCE_TABLE),
            source_column: or_default("ENRICHER_SOURCE_COLUMN", DEFAULT_SOURCE_COLUMN),
            target_table: or_default("ENRICHER_TARGET_TABLE", DEFAULT_TARGET_TABLE),
            checkpoint_file: PathBuf::from(or_default("ENRICHER_CHECKPOINT_FILE", DEFAULT_CHECKPOINT_FILE)),
            log_file: PathBuf::from(or_default("ENRICHER_LOG_FILE", DEFAULT_LOG_FILE)),
            batch_size,
            results_per_entity,
            request_delay: Duration::from_secs(request_delay_secs),
            query_qualifier: or_default("ENRICHER_QUERY_QUALIFIER", DEFAULT_QUERY_QUALIFIER),
        })
    }

    /// PostgREST client configuration.
    pub fn postgrest(&self) -> PostgrestConfig {
        PostgrestConfig {
            source_table: self.source_table.clone(),
            source_column: self.source_column.clone(),
            target_table: self.target_table.clone(),
            entity_column: self.source_column.clone(),
            ..PostgrestConfig::new(&self.supabase_url, &self.supabase_service_key)
        }
    }

    /// Search provider configuration.
    pub fn semantic_scholar(&self) -> SemanticScholarConfig {
        let config = SemanticScholarConfig::default().with_base_url(&self.semantic_scholar_url);
        match &self.semantic_scholar_key {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }

    /// Search client configuration.
    pub fn search_client(&self) -> SearchClientConfig {
        SearchClientConfig {
            results_per_entity: self.results_per_entity,
            query_qualifier: self.query_qualifier.clone(),
            request_spacing: self.request_delay,
            ..Default::default()
        }
    }

    /// Orchestrator configuration.
    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            batch_size: self.batch_size,
            ..Default::default()
        }
    }

    /// Log the resolved configuration with secrets masked.
    pub fn log(&self) {
        let service_key = mask(&self.supabase_service_key);
        let provider_key = self
            .semantic_scholar_key
            .as_deref()
            .map(mask)
            .unwrap_or_else(|| "none".to_string());

        info!(
            supabase_url = %self.supabase_url,
            supabase_service_key = %service_key,
            semantic_scholar_key = %provider_key,
            semantic_scholar_url = %self.semantic_scholar_url,
            source_table = %self.source_table,
            source_column = %self.source_column,
            target_table = %self.target_table,
            checkpoint_file = %self.checkpoint_file.display(),
            log_file = %self.log_file.display(),
            batch_size = self.batch_size,
            results_per_entity = self.results_per_entity,
            request_delay_secs = self.request_delay.as_secs(),
            query_qualifier = %self.query_qualifier,
            "Loaded configuration"
        );
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, EnricherError> {
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| EnricherError::config(format!("{} must be a number, got '{}'", key, raw))),
        None => Ok(default),
    }
}

fn parse_positive(value: Option<String>, key: &str, default: usize) -> Result<usize, EnricherError> {
    let parsed = parse_or(value, key, default)?;
    if parsed == 0 {
        return Err(EnricherError::config(format!("{} must be greater than zero", key)));
    }
    Ok(parsed)
}

/// Keep the first four characters of a secret.
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("SUPABASE_URL", "https://example.supabase.co"),
        ("SUPABASE_SERVICE_KEY", "service-key"),
    ];

    #[test]
    fn test_defaults() {
        let config = EnricherConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.source_table, "sss_ingredients");
        assert_eq!(config.source_column, "ingredient_name");
        assert_eq!(config.target_table, "papers");
        assert_eq!(config.checkpoint_file, PathBuf::from("checkpoint.json"));
        assert_eq!(config.log_file, PathBuf::from("enricher.log"));
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.results_per_entity, 4);
        assert_eq!(config.request_delay, Duration::from_secs(3));
        assert_eq!(config.query_qualifier, "skin");
        assert!(config.semantic_scholar_key.is_none());
        assert_eq!(
            config.semantic_scholar_url,
            "https://api.semanticscholar.org/graph/v1/paper/search"
        );
    }

    #[test]
    fn test_missing_required_variables() {
        let err = EnricherConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")]))
            .unwrap_err();
        assert!(err.to_string().contains("SUPABASE_SERVICE_KEY"));

        let blank = EnricherConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "  "),
            ("SUPABASE_SERVICE_KEY", "key"),
        ]));
        assert!(matches!(blank, Err(EnricherError::ConfigError(_))));
    }

    #[test]
    fn test_overrides_flow_into_component_configs() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("SEMANTIC_SCHOLAR_KEY", "s2-key"),
            ("ENRICHER_SOURCE_TABLE", "catalog"),
            ("ENRICHER_SOURCE_COLUMN", "name"),
            ("ENRICHER_BATCH_SIZE", "25"),
            ("ENRICHER_RESULTS_PER_ENTITY", "8"),
            ("ENRICHER_REQUEST_DELAY_SECS", "0"),
            ("ENRICHER_QUERY_QUALIFIER", "hair"),
        ]);
        let config = EnricherConfig::from_lookup(lookup(&vars)).unwrap();

        let postgrest = config.postgrest();
        assert_eq!(postgrest.source_table, "catalog");
        assert_eq!(postgrest.source_column, "name");
        assert_eq!(postgrest.entity_column, "name");
        assert_eq!(postgrest.api_key, "service-key");

        assert_eq!(config.semantic_scholar().api_key.as_deref(), Some("s2-key"));

        let search = config.search_client();
        assert_eq!(search.results_per_entity, 8);
        assert_eq!(search.request_spacing, Duration::ZERO);
        assert_eq!(search.query_qualifier, "hair");
        assert_eq!(search.max_throttle_retries, 3);

        assert_eq!(config.orchestrator().batch_size, 25);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("ENRICHER_BATCH_SIZE", "lots"));
        assert!(matches!(
            EnricherConfig::from_lookup(lookup(&vars)),
            Err(EnricherError::ConfigError(_))
        ));

        let mut vars = REQUIRED.to_vec();
        vars.push(("ENRICHER_RESULTS_PER_ENTITY", "0"));
        assert!(EnricherConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_mask_keeps_prefix_only() {
        assert_eq!(mask("eyJhbGciOiJIUzI1NiJ9"), "eyJh****");
        assert_eq!(mask("ab"), "ab****");
    }
}

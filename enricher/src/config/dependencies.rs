//! Dependency initialization and wiring for the enricher.

use std::sync::Arc;
use tracing::info;

use crate::{EnricherConfig, EnricherError};
use enrichment_pipeline::{
    EntitySupplier, JsonFileCheckpointStore, Orchestrator, RecordLoader, RecordTransformer,
    SearchClient,
};
use enrichment_repository::{PostgrestClient, SemanticScholarClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Build every pipeline component from the resolved configuration.
    ///
    /// No network calls are made here; the entity source is first contacted
    /// when the orchestrator runs.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(EnricherError)` - If an HTTP client cannot be built
    pub fn new(config: &EnricherConfig) -> Result<Self, EnricherError> {
        info!("Initializing dependencies");

        // One client serves both the entity reads and the record writes
        let store = Arc::new(PostgrestClient::new(config.postgrest())?);
        let provider = Arc::new(SemanticScholarClient::new(config.semantic_scholar())?);

        let supplier = EntitySupplier::new(store.clone());
        let search = SearchClient::with_config(provider, config.search_client());
        let transformer = RecordTransformer::new();
        let loader = RecordLoader::new(store);
        let checkpoint_store = Arc::new(JsonFileCheckpointStore::new(&config.checkpoint_file));

        info!(
            checkpoint_file = %config.checkpoint_file.display(),
            "Pipeline components created"
        );

        let orchestrator = Orchestrator::with_config(
            supplier,
            search,
            transformer,
            loader,
            checkpoint_store,
            config.orchestrator(),
        );

        Ok(Self { orchestrator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrichment_pipeline::PipelineState;

    fn config(url: &str) -> EnricherConfig {
        EnricherConfig::from_lookup(|key| match key {
            "SUPABASE_URL" => Some(url.to_string()),
            "SUPABASE_SERVICE_KEY" => Some("service-key".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_wires_idle_orchestrator() {
        let deps = Dependencies::new(&config("https://example.supabase.co")).unwrap();
        assert_eq!(deps.orchestrator.state(), PipelineState::Idle);
    }

    #[test]
    fn test_invalid_store_url_is_reported() {
        let result = Dependencies::new(&config("not a url"));
        assert!(matches!(result, Err(EnricherError::StoreError(_))));
    }
}

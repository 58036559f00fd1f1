//! Entity supplier implementation.
//!
//! Pages through the entity source until a short page signals completion.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::errors::PipelineError;
use enrichment_repository::EntitySource;

/// Configuration for the entity supplier.
#[derive(Debug, Clone)]
pub struct SupplierConfig {
    /// Rows requested per page.
    pub page_size: usize,
}

impl Default for SupplierConfig {
    fn default() -> Self {
        Self { page_size: 1000 }
    }
}

/// Supplier of the entity names to enrich.
pub struct EntitySupplier {
    source: Arc<dyn EntitySource>,
    config: SupplierConfig,
}

impl EntitySupplier {
    /// Create a new supplier with default configuration.
    pub fn new(source: Arc<dyn EntitySource>) -> Self {
        Self::with_config(source, SupplierConfig::default())
    }

    /// Create a new supplier with custom configuration.
    pub fn with_config(source: Arc<dyn EntitySource>, config: SupplierConfig) -> Self {
        Self { source, config }
    }

    /// Fetch every entity name, deduplicated and sorted ascending.
    ///
    /// Names are kept exactly as stored; only blank values are dropped.
    ///
    /// # Returns
    ///
    /// * `Ok(names)` - All unique, non-blank names
    /// * `Err(PipelineError::SourceUnavailable)` - If any page read fails
    #[instrument(skip(self), fields(page_size = self.config.page_size))]
    pub async fn fetch_all(&self) -> Result<Vec<String>, PipelineError> {
        info!("Fetching entity names from source");

        let page_size = self.config.page_size.max(1);
        let mut names = BTreeSet::new();
        let mut offset = 0;

        loop {
            let page = self.source.fetch_page(offset, page_size).await.map_err(|e| {
                error!(offset = offset, error = %e, "Failed to fetch entity page");
                PipelineError::source_unavailable(e)
            })?;

            let rows = page.len();
            names.extend(
                page.into_iter()
                    .flatten()
                    .filter(|name| !name.trim().is_empty()),
            );

            debug!(offset = offset, rows = rows, unique = names.len(), "Fetched entity page");

            if rows < page_size {
                break;
            }
            offset += page_size;
            info!(unique = names.len(), "Fetched entities so far");
        }

        info!(total = names.len(), "Total unique entities");
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use enrichment_repository::StoreError;
    use std::sync::Mutex;

    /// Mock entity source serving a fixed row list in pages.
    struct MockEntitySource {
        rows: Vec<Option<String>>,
        calls: Mutex<Vec<(usize, usize)>>,
        fail_at_offset: Option<usize>,
    }

    impl MockEntitySource {
        fn new(rows: Vec<Option<&str>>) -> Self {
            Self {
                rows: rows.into_iter().map(|r| r.map(str::to_string)).collect(),
                calls: Mutex::new(Vec::new()),
                fail_at_offset: None,
            }
        }
    }

    #[async_trait]
    impl EntitySource for MockEntitySource {
        async fn fetch_page(
            &self,
            offset: usize,
            limit: usize,
        ) -> Result<Vec<Option<String>>, StoreError> {
            self.calls.lock().unwrap().push((offset, limit));
            if self.fail_at_offset == Some(offset) {
                return Err(StoreError::connection("connection refused"));
            }
            Ok(self.rows.iter().skip(offset).take(limit).cloned().collect())
        }
    }

    #[tokio::test]
    async fn test_fetch_all_dedups_and_sorts() {
        let source = Arc::new(MockEntitySource::new(vec![
            Some("Retinol"),
            Some("Niacinamide"),
            None,
            Some("Retinol"),
            Some(" "),
            Some("Azelaic Acid"),
        ]));
        let supplier = EntitySupplier::with_config(source.clone(), SupplierConfig { page_size: 4 });

        let names = supplier.fetch_all().await.unwrap();
        assert_eq!(names, vec!["Azelaic Acid", "Niacinamide", "Retinol"]);
        assert_eq!(*source.calls.lock().unwrap(), vec![(0, 4), (4, 4)]);
    }

    #[tokio::test]
    async fn test_exact_multiple_ends_on_empty_page() {
        let source = Arc::new(MockEntitySource::new(vec![
            Some("A"),
            Some("B"),
            Some("C"),
            Some("D"),
        ]));
        let supplier = EntitySupplier::with_config(source.clone(), SupplierConfig { page_size: 2 });

        let names = supplier.fetch_all().await.unwrap();
        assert_eq!(names.len(), 4);
        assert_eq!(*source.calls.lock().unwrap(), vec![(0, 2), (2, 2), (4, 2)]);
    }

    #[tokio::test]
    async fn test_null_rows_count_towards_full_page() {
        let source = Arc::new(MockEntitySource::new(vec![None, None, Some("Zinc")]));
        let supplier = EntitySupplier::with_config(source.clone(), SupplierConfig { page_size: 2 });

        let names = supplier.fetch_all().await.unwrap();
        assert_eq!(names, vec!["Zinc"]);
    }

    #[tokio::test]
    async fn test_source_failure_is_fatal() {
        let mut source = MockEntitySource::new(vec![Some("A"), Some("B"), Some("C")]);
        source.fail_at_offset = Some(2);
        let supplier = EntitySupplier::with_config(Arc::new(source), SupplierConfig { page_size: 2 });

        let err = supplier.fetch_all().await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_names_are_not_normalized() {
        let source = Arc::new(MockEntitySource::new(vec![
            Some("Retinol "),
            Some("Retinol"),
            Some("\t"),
        ]));
        let supplier = EntitySupplier::new(source);

        let names = supplier.fetch_all().await.unwrap();
        assert_eq!(names, vec!["Retinol", "Retinol "]);
    }
}

//! Loader module for the enrichment pipeline.
//!
//! Persists transformed records into the record store with deduplication.

use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use enrichment_repository::RecordStore;
use enrichment_shared::EnrichmentRecord;

/// Counters for one `insert_batch` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records handed to the loader.
    pub candidates: usize,
    /// Records dropped for a missing entity name or title.
    pub invalid: usize,
    /// Records already present in the store.
    pub skipped: usize,
    /// Records newly written.
    pub inserted: usize,
    /// Records whose existence check or insert failed.
    pub failed: usize,
}

/// Loader that writes enrichment records to the record store.
///
/// The loader is responsible for:
/// - Dropping records that cannot be persisted
/// - Skipping records whose identity is already stored
/// - Assigning ids to new records
/// - Isolating per-record failures from the rest of the batch
pub struct RecordLoader {
    store: Arc<dyn RecordStore>,
}

impl RecordLoader {
    /// Create a new record loader with the given store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Insert a batch of records, skipping the ones already stored.
    ///
    /// Never fails as a whole: each record's outcome is reflected in the
    /// returned [`LoadSummary`].
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn insert_batch(&self, records: Vec<EnrichmentRecord>) -> LoadSummary {
        let mut summary = LoadSummary {
            candidates: records.len(),
            ..Default::default()
        };

        let valid: Vec<EnrichmentRecord> = records.into_iter().filter(|r| r.is_valid()).collect();
        summary.invalid = summary.candidates - valid.len();

        if valid.is_empty() {
            info!(invalid = summary.invalid, "No valid records to insert");
            return summary;
        }

        info!(count = valid.len(), "Inserting records");

        for mut record in valid {
            let Some((entity, title)) = record.identity() else {
                continue;
            };
            let (entity, title) = (entity.to_string(), title.to_string());

            match self.store.exists(&entity, &title).await {
                Ok(true) => {
                    debug!(entity = %entity, title = %title, "Record already stored");
                    summary.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    error!(entity = %entity, title = %title, error = %e, "Existence check failed");
                    summary.failed += 1;
                    continue;
                }
            }

            record.ensure_id();
            match self.store.insert(&record).await {
                Ok(()) => summary.inserted += 1,
                Err(e) if e.is_duplicate() => {
                    debug!(entity = %entity, title = %title, "Duplicate rejected by store");
                    summary.skipped += 1;
                }
                Err(e) => {
                    error!(entity = %entity, title = %title, error = %e, "Failed to insert record");
                    summary.failed += 1;
                }
            }
        }

        info!(
            inserted = summary.inserted,
            skipped = summary.skipped,
            failed = summary.failed,
            invalid = summary.invalid,
            "Batch insert completed"
        );
        summary
    }
}

//! Record store trait definition.

use async_trait::async_trait;

use crate::errors::StoreError;
use enrichment_shared::EnrichmentRecord;

/// Table-like store of enrichment records.
///
/// The pair `(entity_name, title)` identifies a record. Implementations
/// should back this with a uniqueness constraint and report a violation as
/// [`StoreError::Duplicate`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Check whether a record with this identity is already stored.
    async fn exists(&self, entity_name: &str, title: &str) -> Result<bool, StoreError>;

    /// Insert a new record.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The row was written
    /// * `Err(StoreError::Duplicate)` - The identity already exists
    /// * `Err(StoreError)` - Any other failure
    async fn insert(&self, record: &EnrichmentRecord) -> Result<(), StoreError>;
}

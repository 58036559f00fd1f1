//! Entity source trait definition.

use async_trait::async_trait;

use crate::errors::StoreError;

/// Paginated, read-only provider of entity names.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Fetch one page of entity names.
    ///
    /// Rows whose name column is null come back as `None` so the caller can
    /// still tell a short page from a full one.
    ///
    /// # Arguments
    ///
    /// * `offset` - Zero-based row offset
    /// * `limit` - Page size
    ///
    /// # Returns
    ///
    /// * `Ok(rows)` - Fewer than `limit` rows means the source is exhausted
    /// * `Err(StoreError)` - If the source is unreachable after the
    ///   implementation's own retries
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Option<String>>, StoreError>;
}

//! Checkpoint module for the enrichment pipeline.
//!
//! Durable record of which entities have been processed, so an interrupted
//! run resumes where it stopped.

mod file_store;
mod state;

pub use file_store::JsonFileCheckpointStore;
pub use state::Checkpoint;

use async_trait::async_trait;

use crate::errors::CheckpointError;

/// Durable storage for the pipeline checkpoint.
///
/// Single writer, single process: no locking is expected of implementations.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the last saved checkpoint, or an empty one if none exists.
    async fn load(&self) -> Result<Checkpoint, CheckpointError>;

    /// Stamp `last_updated` and persist the checkpoint, fully superseding
    /// the previous snapshot.
    async fn save(&self, checkpoint: &mut Checkpoint) -> Result<(), CheckpointError>;
}

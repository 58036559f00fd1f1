//! # Enrichment Pipeline
//!
//! This crate provides the pipeline components for attaching reference
//! documents from a search provider to every entity of a catalog, resumably.
//!
//! ## Architecture
//!
//! The pipeline follows the Supplier-Processor-Loader pattern:
//!
//! 1. **Supplier**: Reads the deduplicated entity list
//! 2. **Search**: Queries the provider with pacing and throttle backoff
//! 3. **Processor**: Transforms provider documents into records
//! 4. **Loader**: Persists records, skipping ones already stored
//! 5. **Checkpoint**: Remembers which entities are done
//! 6. **Orchestrator**: Coordinates the pipeline flow and shutdown

pub mod checkpoint;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod search;
pub mod supplier;

pub use checkpoint::{Checkpoint, CheckpointStore, JsonFileCheckpointStore};
pub use errors::{CheckpointError, PipelineError};
pub use loader::{LoadSummary, RecordLoader};
pub use orchestrator::{
    Orchestrator, OrchestratorConfig, PipelineState, RunOutcome, RunSummary, ShutdownHandle,
};
pub use processor::{RecordTransformer, TransformerConfig};
pub use search::{backoff_delay, SearchClient, SearchClientConfig};
pub use supplier::{EntitySupplier, SupplierConfig};

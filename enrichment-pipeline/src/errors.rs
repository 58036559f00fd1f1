//! Error types for the enrichment pipeline.

use enrichment_repository::StoreError;
use thiserror::Error;

/// Errors that can occur while reading or writing the checkpoint file.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// Filesystem failure.
    #[error("Checkpoint IO error at {path}: {source}")]
    Io {
        /// Checkpoint path involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid checkpoint.
    #[error("Corrupt checkpoint at {path}: {message}")]
    Corrupt {
        /// Checkpoint path involved.
        path: String,
        /// Parser message.
        message: String,
    },

    /// The checkpoint could not be serialized.
    #[error("Checkpoint serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CheckpointError {
    /// Create an IO error for the given path.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a corrupt checkpoint error.
    pub fn corrupt(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: msg.into(),
        }
    }
}

/// Errors that can occur in the enrichment pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The entity source could not be read. Fatal: nothing can be enriched.
    #[error("Entity source unavailable: {0}")]
    SourceUnavailable(#[source] StoreError),

    /// Checkpoint load or save failed.
    #[error("Checkpoint error: {0}")]
    CheckpointError(#[from] CheckpointError),

    /// A per-entity step panicked.
    #[error("Processing of '{entity}' panicked: {message}")]
    EntityPanicked {
        /// Entity being processed.
        entity: String,
        /// Panic payload, when it was a string.
        message: String,
    },

    /// Persisting the record buffer panicked.
    #[error("Record flush panicked: {message}")]
    FlushPanicked {
        /// Panic payload, when it was a string.
        message: String,
    },
}

impl PipelineError {
    /// Create a source unavailable error.
    pub fn source_unavailable(err: StoreError) -> Self {
        Self::SourceUnavailable(err)
    }
}

//! JSON file checkpoint store.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::errors::CheckpointError;

/// Checkpoint store backed by a pretty-printed JSON file.
///
/// Saves go to a sibling `.tmp` file that is synced and then renamed over the
/// target, so a crash mid-write leaves either the old or the new snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileCheckpointStore {
    path: PathBuf,
}

impl JsonFileCheckpointStore {
    /// Create a store for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the checkpoint file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl CheckpointStore for JsonFileCheckpointStore {
    async fn load(&self) -> Result<Checkpoint, CheckpointError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.display_path(), "No checkpoint found, starting fresh");
                return Ok(Checkpoint::default());
            }
            Err(e) => return Err(CheckpointError::io(self.display_path(), e)),
        };

        let checkpoint: Checkpoint = serde_json::from_str(&content)
            .map_err(|e| CheckpointError::corrupt(self.display_path(), e.to_string()))?;

        info!(
            path = %self.display_path(),
            processed = checkpoint.processed.len(),
            total_records_found = checkpoint.total_records_found,
            "Loaded checkpoint"
        );
        Ok(checkpoint)
    }

    async fn save(&self, checkpoint: &mut Checkpoint) -> Result<(), CheckpointError> {
        checkpoint.last_updated = Some(Utc::now());
        let body = serde_json::to_vec_pretty(checkpoint)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CheckpointError::io(parent.display().to_string(), e))?;
        }

        let temp_path = self.temp_path();
        let temp_display = temp_path.display().to_string();

        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| CheckpointError::io(temp_display.clone(), e))?;
        file.write_all(&body)
            .await
            .map_err(|e| CheckpointError::io(temp_display.clone(), e))?;
        file.sync_all()
            .await
            .map_err(|e| CheckpointError::io(temp_display.clone(), e))?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| CheckpointError::io(self.display_path(), e))?;

        debug!(path = %self.display_path(), bytes = body.len(), "Checkpoint written");
        info!(
            processed = checkpoint.processed.len(),
            total_records_found = checkpoint.total_records_found,
            "Checkpoint saved"
        );
        Ok(())
    }
}

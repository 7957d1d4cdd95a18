use crate::storage::{StorageError, TranscriptStore};
use crate::types::Turn;
use std::path::{Path, PathBuf};

/// Transcript persisted as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl TranscriptStore for JsonFileStore {
    async fn save(&self, turns: &[Turn]) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(turns)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // replace atomically
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!(path = %self.path.display(), turns = turns.len(), "Saved transcript");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Turn>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read transcript, starting empty");
                return Ok(Vec::new());
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(turns) => Ok(turns),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt transcript, starting empty");
                Ok(Vec::new())
            }
        }
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

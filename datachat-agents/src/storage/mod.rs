use crate::types::Turn;
use async_trait::async_trait;

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

/// Blob storage for a single transcript.
///
/// `load` on missing or unreadable data yields an empty transcript, never an
/// error.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn save(&self, turns: &[Turn]) -> Result<(), StorageError>;
    async fn load(&self) -> Result<Vec<Turn>, StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

use crate::storage::{StorageError, TranscriptStore};
use crate::types::Turn;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct InMemoryStore {
    turns: Arc<Mutex<Vec<Turn>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_turns(turns: Vec<Turn>) -> Self {
        Self {
            turns: Arc::new(Mutex::new(turns)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Turn>>, StorageError> {
        self.turns
            .lock()
            .map_err(|e| StorageError::OperationFailed(format!("Transcript lock poisoned: {}", e)))
    }
}

#[async_trait::async_trait]
impl TranscriptStore for InMemoryStore {
    async fn save(&self, turns: &[Turn]) -> Result<(), StorageError> {
        *self.lock()? = turns.to_vec();
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Turn>, StorageError> {
        Ok(self.lock()?.clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.lock()?.clear();
        Ok(())
    }
}

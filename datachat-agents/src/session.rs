use crate::context::ConversationContext;
use crate::storage::{StorageError, TranscriptStore};
use crate::types::Turn;
use std::sync::Arc;

/// The transcript of one conversation plus the store it is persisted to.
/// Every mutation goes through here and is saved right after.
pub struct Session {
    context: ConversationContext,
    store: Arc<dyn TranscriptStore>,
}

impl Session {
    pub async fn load(store: Arc<dyn TranscriptStore>) -> Result<Self, StorageError> {
        let turns = store.load().await?;
        tracing::debug!(turns = turns.len(), "Loaded transcript");

        Ok(Self {
            context: ConversationContext::from_turns(turns),
            store,
        })
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn turns(&self) -> &[Turn] {
        self.context.turns()
    }

    /// Append a turn and persist the transcript. A failed save is logged and
    /// the in-memory transcript keeps the turn.
    pub async fn record(&mut self, turn: Turn) {
        tracing::debug!(kind = turn.label(), "Recording turn");
        self.context.append(turn);

        if let Err(e) = self.store.save(self.context.turns()).await {
            tracing::warn!(error = %e, "Failed to save transcript");
        }
    }

    pub async fn reset(&mut self) -> Result<(), StorageError> {
        self.context.clear();
        self.store.clear().await
    }
}

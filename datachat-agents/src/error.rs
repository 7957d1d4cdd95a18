use datachat_llm_sdk::error::LlmError;
use datachat_tools::{SafetyRejection, ToolError};

/// Failure of one stage of a turn. The display text is what lands in the
/// transcript as an `Error` turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("System Error: {0}")]
    Model(#[from] LlmError),

    #[error("SQL Error: {0}")]
    SafetyRejection(#[from] SafetyRejection),

    #[error("SQL Error: {0}")]
    Database(String),
}

impl From<ToolError> for TurnError {
    fn from(err: ToolError) -> Self {
        TurnError::Database(err.to_string())
    }
}

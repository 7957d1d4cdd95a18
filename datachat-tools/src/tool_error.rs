/// Database-side error
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Driver-level failure; carries the driver's message verbatim
    #[error("{0}")]
    ExecutionError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::IoError(err.to_string())
    }
}

impl From<rusqlite::Error> for ToolError {
    fn from(err: rusqlite::Error) -> Self {
        ToolError::ExecutionError(err.to_string())
    }
}

use crate::{
    error::LlmError,
    types::{CompletionRequest, CompletionResponse},
};
use async_trait::async_trait;

/// A hosted text-completion service.
///
/// Implementations send one rendered prompt and return the model's reply.
/// They never retry; a failed call surfaces as an [`LlmError`].
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a request (non-streaming)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Get provider name (e.g., "groq")
    fn provider_name(&self) -> &str;

    /// Get model name (e.g., "llama-3.3-70b-versatile")
    fn model_name(&self) -> &str;
}

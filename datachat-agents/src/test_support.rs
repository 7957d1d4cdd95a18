use async_trait::async_trait;
use datachat_llm_sdk::client::LlmClient;
use datachat_llm_sdk::error::LlmError;
use datachat_llm_sdk::types::{CompletionRequest, CompletionResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// LLM client answering from a queue of scripted replies and recording
/// every request it receives
pub struct MockLlmClient {
    pub responses: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn with_replies(replies: &[&str]) -> Arc<Self> {
        let client = Self::new();
        for reply in replies {
            client.push_reply(reply);
        }
        client
    }

    pub fn push_reply(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(CompletionResponse::assistant_text(text)));
    }

    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> CompletionRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::internal("no scripted reply left")))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

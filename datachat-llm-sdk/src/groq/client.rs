use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::{
    client::LlmClient,
    error::LlmError,
    groq::types::{
        GroqChatCompletionRequest, GroqChatCompletionResponse, GroqErrorResponse,
        GroqResponseFormat, GroqRole,
    },
    models,
    types::{CompletionRequest, CompletionResponse, ContentBlock, ResponseFormat, Role, Usage},
};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";

/// Client for Groq's OpenAI-compatible chat completions API
pub struct GroqClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl GroqClient {
    /// Create a new Groq client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: models::groq::DEFAULT_MODEL.to_string(),
            http_client,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Model used when a generic request leaves the model empty
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a chat completion
    pub async fn create_chat_completion(
        &self,
        request: GroqChatCompletionRequest,
    ) -> Result<GroqChatCompletionResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| LlmError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(model = %request.model, url = %url, "Sending Groq chat completion");

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| LlmError::Network { source: e })?;
            serde_json::from_str::<GroqChatCompletionResponse>(&body)
                .map_err(|e| LlmError::internal(format!("Failed to parse response: {}", e)))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = serde_json::from_str::<GroqErrorResponse>(&error_text)
                .map(|parsed| parsed.error.message)
                .unwrap_or(error_text);

            Err(error_for_status(status, message))
        }
    }
}

fn error_for_status(status: StatusCode, message: String) -> LlmError {
    match status {
        StatusCode::BAD_REQUEST if message.to_lowercase().contains("api key") => {
            LlmError::authentication(message)
        }
        StatusCode::BAD_REQUEST => LlmError::invalid_request(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::authentication(message),
        StatusCode::PAYLOAD_TOO_LARGE => LlmError::invalid_request("Request too large"),
        StatusCode::TOO_MANY_REQUESTS => LlmError::rate_limit(message, None),
        _ => LlmError::api_error(status.as_u16(), message),
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model
        };

        let mut builder = self.message_builder().model(model).max_tokens(request.max_tokens);

        if let Some(system) = request.system {
            builder = builder.system_message(system);
        }

        for message in request.messages {
            let text = message.joined_text();
            builder = builder.message(message.role.to_string(), text);
        }

        if let Some(temperature) = request.temperature {
            builder = builder.temperature(temperature);
        }

        if let Some(format) = request.response_format {
            builder = builder.response_format(match format {
                ResponseFormat::Text => GroqResponseFormat::text(),
                ResponseFormat::JsonObject => GroqResponseFormat::json_object(),
            });
        }

        let groq_response = builder.send().await?;

        let choice = groq_response
            .choices
            .first()
            .ok_or_else(|| LlmError::internal("No completion choices returned"))?;

        Ok(CompletionResponse {
            content: vec![ContentBlock::Text {
                text: choice.message.content.clone(),
            }],
            role: match choice.message.role {
                GroqRole::User => Role::User,
                GroqRole::Assistant => Role::Assistant,
                GroqRole::System => Role::System,
            },
            usage: Usage {
                input_tokens: groq_response
                    .usage
                    .as_ref()
                    .map(|u| u.prompt_tokens)
                    .unwrap_or(0),
                output_tokens: groq_response
                    .usage
                    .as_ref()
                    .map(|u| u.completion_tokens)
                    .unwrap_or(0),
            },
            stop_reason: choice.finish_reason.clone(),
        })
    }

    fn provider_name(&self) -> &str {
        crate::providers::GROQ
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

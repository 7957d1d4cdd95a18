use crate::{
    error::LlmError,
    groq::{
        client::GroqClient,
        types::{
            GroqChatCompletionRequest, GroqChatCompletionResponse, GroqMessage,
            GroqResponseFormat, GroqRole,
        },
    },
};

/// Builder for creating Groq chat completion requests
pub struct GroqMessageBuilder<'a> {
    client: &'a GroqClient,
    model: Option<String>,
    max_tokens: Option<u32>,
    messages: Vec<GroqMessage>,
    temperature: Option<f32>,
    response_format: Option<GroqResponseFormat>,
}

impl<'a> GroqMessageBuilder<'a> {
    pub fn new(client: &'a GroqClient) -> Self {
        Self {
            client,
            model: None,
            max_tokens: None,
            messages: Vec::new(),
            temperature: None,
            response_format: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Add a message to the conversation
    ///
    /// Valid roles: "system", "user", "assistant".
    /// Unknown roles are treated as "user".
    pub fn message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        let role_str = role.into();
        let role = match role_str.as_str() {
            "system" => GroqRole::System,
            "user" => GroqRole::User,
            "assistant" => GroqRole::Assistant,
            _ => {
                tracing::warn!("Invalid role '{}', defaulting to 'user'", role_str);
                GroqRole::User
            }
        };

        self.messages.push(GroqMessage::new(role, content));
        self
    }

    pub fn system_message(self, content: impl Into<String>) -> Self {
        self.message("system", content)
    }

    pub fn user_message(self, content: impl Into<String>) -> Self {
        self.message("user", content)
    }

    pub fn assistant_message(self, content: impl Into<String>) -> Self {
        self.message("assistant", content)
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn response_format(mut self, format: GroqResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Assemble the wire request without sending it
    pub fn build(self) -> Result<GroqChatCompletionRequest, LlmError> {
        if self.messages.is_empty() {
            return Err(LlmError::invalid_request("At least one message is required"));
        }

        Ok(GroqChatCompletionRequest {
            model: self
                .model
                .ok_or_else(|| LlmError::invalid_request("Model must be specified"))?,
            messages: self.messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: self.response_format,
        })
    }

    /// Send the request and get the response
    pub async fn send(self) -> Result<GroqChatCompletionResponse, LlmError> {
        let client = self.client;
        let request = self.build()?;
        client.create_chat_completion(request).await
    }
}

impl GroqClient {
    /// Start building a chat completion request
    pub fn message_builder(&self) -> GroqMessageBuilder<'_> {
        GroqMessageBuilder::new(self)
    }
}

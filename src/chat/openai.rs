//! OpenAI-compatible chat completion implementation.

use super::ChatModel;
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat model backed by an OpenAI-compatible API.
///
/// With an `api_base` override this also talks to local servers exposing
/// the same API (e.g. Ollama).
pub struct OpenAIChat {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIChat {
    /// Create a chat model client.
    pub fn new(model: &str, api_base: Option<&str>) -> Self {
        Self {
            client: create_client(api_base),
            model: model.to_string(),
        }
    }

    /// Build a chat model from settings.
    pub fn from_settings(settings: &crate::config::GenerationSettings) -> Self {
        Self::new(&settings.model, settings.api_base.as_deref())
    }
}

#[async_trait]
impl ChatModel for OpenAIChat {
    #[instrument(skip(self, system, user))]
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| SvarError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user.to_string())
                .build()
                .map_err(|e| SvarError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(temperature)
            .build()
            .map_err(|e| SvarError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SvarError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SvarError::Generation("Empty response from chat model".to_string()))?
            .clone();

        debug!("Chat completion returned {} chars", answer.len());
        Ok(answer)
    }
}

//! Chat completion for answer generation.

mod openai;

pub use openai::OpenAIChat;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for chat completion implementations.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run a single-turn completion: one system instruction, one user
    /// message. Returns the model's message content.
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String>;
}

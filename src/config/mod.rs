//! Configuration module for Svar.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts};
pub use settings::{
    CorpusSettings, EmbeddingSettings, GeneralSettings, GenerationSettings, PromptSettings,
    RerankSettings, Settings, VectorStoreSettings,
};

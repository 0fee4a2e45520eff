//! CLI command implementations.

mod answer;
mod ask;
mod build;
mod config;
mod doctor;
mod index;
mod init;
mod list;
mod search;

pub use answer::run_answer;
pub use ask::run_ask;
pub use build::run_build;
pub use config::run_config;
pub use doctor::run_doctor;
pub use index::run_index;
pub use init::run_init;
pub use list::run_list;
pub use search::run_search;

use crate::chat::{ChatModel, OpenAIChat};
use crate::config::{Prompts, Settings};
use crate::corpus::Category;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, SvarError};
use crate::rag::{AnswerEngine, Retriever};
use crate::rerank::{EmbeddingReranker, HttpReranker, Reranker};
use crate::vector_store::{MemoryVectorStore, SqliteVectorStore, VectorStore};
use std::sync::Arc;

/// Open the configured vector store.
pub(crate) fn open_store(settings: &Settings) -> Result<Arc<dyn VectorStore>> {
    match settings.vector_store.provider.as_str() {
        "sqlite" => Ok(Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?)),
        "memory" => Ok(Arc::new(MemoryVectorStore::new())),
        other => Err(SvarError::Config(format!(
            "Unknown vector store provider: {}",
            other
        ))),
    }
}

/// Build the configured embedder.
pub(crate) fn build_embedder(settings: &Settings) -> Arc<dyn Embedder> {
    Arc::new(OpenAIEmbedder::from_settings(&settings.embedding))
}

/// Build the configured reranker.
pub(crate) fn build_reranker(
    settings: &Settings,
    embedder: Arc<dyn Embedder>,
) -> Result<Arc<dyn Reranker>> {
    match settings.rerank.provider.as_str() {
        "http" => Ok(Arc::new(HttpReranker::new(
            &settings.rerank.endpoint,
            &settings.rerank.model,
        ))),
        "embedding" => Ok(Arc::new(EmbeddingReranker::new(embedder))),
        other => Err(SvarError::Config(format!(
            "Unknown rerank provider: {}",
            other
        ))),
    }
}

/// Wire up the full retrieve/rerank/generate engine from settings.
pub(crate) fn build_engine(settings: &Settings) -> Result<AnswerEngine> {
    let store = open_store(settings)?;
    let embedder = build_embedder(settings);
    let reranker = build_reranker(settings, embedder.clone())?;

    let retriever = Retriever::new(store, embedder, reranker)
        .with_candidates(settings.rerank.candidates)
        .with_top_n(settings.rerank.top_n);

    let chat: Arc<dyn ChatModel> = Arc::new(OpenAIChat::from_settings(&settings.generation));

    Ok(AnswerEngine::new(retriever, chat)
        .with_prompts(Prompts::from_settings(&settings.prompts))
        .with_temperature(settings.generation.temperature))
}

/// Parse an optional category argument, defaulting to all categories.
pub(crate) fn parse_categories(category: Option<&str>) -> Result<Vec<Category>> {
    match category {
        Some(name) => Ok(vec![name.parse()?]),
        None => Ok(Category::ALL.to_vec()),
    }
}

//! Candidate reranking for retrieval.
//!
//! Similarity search casts a wide net; the reranker reorders that candidate
//! set with a more precise relevance model and keeps the top few passages.

mod embedding;
mod http;

pub use embedding::EmbeddingReranker;
pub use http::HttpReranker;

use crate::error::Result;
use async_trait::async_trait;

/// A candidate passage after reranking.
#[derive(Debug, Clone)]
pub struct RankedPassage {
    /// Index of this passage in the input candidate list.
    pub index: usize,
    /// Passage text.
    pub text: String,
    /// Relevance score assigned by the reranker (higher is better).
    pub score: f32,
}

/// Trait for reranker implementations.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Rerank `candidates` against `query` and return the `top_n` most
    /// relevant passages, best first.
    async fn rerank(
        &self,
        query: &str,
        candidates: &[String],
        top_n: usize,
    ) -> Result<Vec<RankedPassage>>;
}

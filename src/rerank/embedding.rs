//! Embedding-based reranking fallback.
//!
//! Scores candidates by cosine similarity between the query embedding and
//! each candidate embedding. Less precise than a cross-encoder, but works
//! offline with whatever embedder the pipeline already has.

use super::{RankedPassage, Reranker};
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::cosine_similarity;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Cosine-similarity reranker backed by an embedder.
pub struct EmbeddingReranker {
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingReranker {
    /// Create a reranker over the given embedder.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }
}

#[async_trait]
impl Reranker for EmbeddingReranker {
    #[instrument(skip(self, query, candidates), fields(count = candidates.len()))]
    async fn rerank(
        &self,
        query: &str,
        candidates: &[String],
        top_n: usize,
    ) -> Result<Vec<RankedPassage>> {
        if candidates.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        // One batched call for query plus candidates
        let mut inputs = Vec::with_capacity(candidates.len() + 1);
        inputs.push(query.to_string());
        inputs.extend(candidates.iter().cloned());

        let embeddings = self.embedder.embed_batch(&inputs).await?;
        let query_embedding = &embeddings[0];

        let mut passages: Vec<RankedPassage> = embeddings[1..]
            .iter()
            .enumerate()
            .map(|(index, embedding)| RankedPassage {
                index,
                text: candidates[index].clone(),
                score: cosine_similarity(query_embedding, embedding),
            })
            .collect();

        passages.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        passages.truncate(top_n);

        debug!("Reranked {} candidates to {}", candidates.len(), passages.len());
        Ok(passages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    /// Embedder that maps known strings to fixed vectors.
    struct FixtureEmbedder;

    #[async_trait]
    impl Embedder for FixtureEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(match text {
                "query" => vec![1.0, 0.0],
                "close" => vec![0.9, 0.1],
                "far" => vec![0.0, 1.0],
                _ => vec![0.5, 0.5],
            })
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::new();
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn test_rerank_orders_by_similarity() {
        let reranker = EmbeddingReranker::new(Arc::new(FixtureEmbedder));
        let candidates = vec!["far".to_string(), "close".to_string()];

        let passages = reranker.rerank("query", &candidates, 2).await.unwrap();
        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].text, "close");
        assert_eq!(passages[0].index, 1);
        assert!(passages[0].score > passages[1].score);
    }

    #[tokio::test]
    async fn test_top_n_truncates() {
        let reranker = EmbeddingReranker::new(Arc::new(FixtureEmbedder));
        let candidates = vec!["far".to_string(), "close".to_string(), "other".to_string()];

        let passages = reranker.rerank("query", &candidates, 1).await.unwrap();
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].text, "close");
    }
}

//! Retrieval: filtered similarity search plus reranking.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::rerank::{RankedPassage, Reranker};
use crate::vector_store::{SearchFilter, SearchResult, VectorStore};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Retrieves and reranks candidate passages for a query.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    reranker: Arc<dyn Reranker>,
    candidates: usize,
    top_n: usize,
}

impl Retriever {
    /// Create a new retriever.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        reranker: Arc<dyn Reranker>,
    ) -> Self {
        Self {
            store,
            embedder,
            reranker,
            candidates: 30,
            top_n: 4,
        }
    }

    /// Set the number of candidates fetched from the vector store.
    pub fn with_candidates(mut self, candidates: usize) -> Self {
        self.candidates = candidates;
        self
    }

    /// Set the number of passages kept after reranking.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Similarity search without reranking.
    #[instrument(skip(self, query, filter))]
    pub async fn search(
        &self,
        query: &str,
        filter: &SearchFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;
        self.store.search(&query_embedding, filter, limit).await
    }

    /// Retrieve candidates for a query and rerank them to the top passages.
    ///
    /// A filter that matches nothing returns an empty list; the warning is
    /// the only signal, since metadata mismatches are otherwise silent.
    #[instrument(skip(self, query, filter))]
    pub async fn retrieve(&self, query: &str, filter: &SearchFilter) -> Result<Vec<RankedPassage>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .store
            .search(&query_embedding, filter, self.candidates)
            .await?;

        if results.is_empty() {
            warn!("Retrieval returned zero candidates; check category/source filters");
            return Ok(Vec::new());
        }

        debug!("Retrieved {} candidates", results.len());

        let candidates: Vec<String> = results.into_iter().map(|r| r.record.text).collect();
        self.reranker.rerank(query, &candidates, self.top_n).await
    }
}

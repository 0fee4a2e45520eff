//! Indexer: chunk JSON files in, embedded records in the vector store out.

use crate::corpus::{self, Category};
use crate::embedding::Embedder;
use crate::error::{Result, SvarError};
use crate::vector_store::{IndexedRecord, VectorStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Outcome of indexing one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// Category indexed with this many records.
    Indexed(usize),
    /// Category skipped; the reason is recorded for the caller.
    Skipped(String),
}

/// Embeds chunk files and writes them to the vector store.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl Indexer {
    /// Create a new indexer.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Index a single category's chunk file.
    ///
    /// Record ids are deterministic and the upsert is transactional, so
    /// re-running replaces existing records instead of duplicating them,
    /// and a crash never commits half a batch.
    #[instrument(skip(self, documents_dir))]
    pub async fn index_category(
        &self,
        documents_dir: &Path,
        category: Category,
    ) -> Result<usize> {
        let chunks = corpus::read_chunks(documents_dir, category)?;
        info!("Loaded {} {} chunks", chunks.len(), category);

        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != texts.len() {
            return Err(SvarError::Embedding(format!(
                "Embedding count mismatch for {}: {} texts, {} embeddings",
                category,
                texts.len(),
                embeddings.len()
            )));
        }

        let records: Vec<IndexedRecord> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedRecord::from_chunk(chunk, embedding))
            .collect();

        let written = self.store.upsert_batch(&records).await?;
        info!("Indexed {} {} records", written, category);
        Ok(written)
    }

    /// Index every category, skipping ones whose chunk file is missing or
    /// malformed. Vector-store errors still abort the run.
    pub async fn index_all(&self, documents_dir: &Path) -> Result<Vec<(Category, IndexOutcome)>> {
        let mut outcomes = Vec::new();

        for category in Category::ALL {
            let outcome = match self.index_category(documents_dir, category).await {
                Ok(count) => IndexOutcome::Indexed(count),
                Err(e @ (SvarError::Io(_) | SvarError::Json(_))) => {
                    warn!("Skipping {}: {}", category, e);
                    IndexOutcome::Skipped(e.to_string())
                }
                Err(e) => {
                    error!("Indexing {} failed: {}", category, e);
                    return Err(e);
                }
            };
            outcomes.push((category, outcome));
        }

        Ok(outcomes)
    }

    /// Delete a category's records before re-indexing it.
    pub async fn rebuild_category(
        &self,
        documents_dir: &Path,
        category: Category,
    ) -> Result<usize> {
        let deleted = self.store.delete_by_category(category).await?;
        info!("Cleared {} existing {} records", deleted, category);
        self.index_category(documents_dir, category).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::DocumentChunk;
    use crate::vector_store::{MemoryVectorStore, SearchFilter};
    use async_trait::async_trait;

    /// Embedder producing a fixed-dimension vector per text length.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
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

    fn write_fixture(dir: &Path, category: Category, texts: &[&str]) {
        let chunks: Vec<DocumentChunk> = texts
            .iter()
            .map(|t| DocumentChunk::new(*t, "src", category))
            .collect();
        corpus::write_chunks(dir, category, &chunks).unwrap();
    }

    #[tokio::test]
    async fn test_index_category_one_record_per_chunk() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), Category::Finance, &["alpha", "beta", "gamma"]);

        let store = Arc::new(MemoryVectorStore::new());
        let indexer = Indexer::new(Arc::new(StubEmbedder), store.clone());

        let count = indexer
            .index_category(dir.path(), Category::Finance)
            .await
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(store.record_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reindex_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), Category::Faq, &["q1", "q2"]);

        let store = Arc::new(MemoryVectorStore::new());
        let indexer = Indexer::new(Arc::new(StubEmbedder), store.clone());

        indexer.index_category(dir.path(), Category::Faq).await.unwrap();
        indexer.index_category(dir.path(), Category::Faq).await.unwrap();

        assert_eq!(store.record_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_index_all_skips_missing_categories() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), Category::Insurance, &["terms"]);
        // finance.json and faq.json are absent

        let store = Arc::new(MemoryVectorStore::new());
        let indexer = Indexer::new(Arc::new(StubEmbedder), store.clone());

        let outcomes = indexer.index_all(dir.path()).await.unwrap();
        assert_eq!(outcomes.len(), 3);

        let by_category: std::collections::HashMap<_, _> = outcomes.into_iter().collect();
        assert_eq!(
            by_category[&Category::Insurance],
            IndexOutcome::Indexed(1)
        );
        assert!(matches!(
            by_category[&Category::Finance],
            IndexOutcome::Skipped(_)
        ));
        assert!(matches!(by_category[&Category::Faq], IndexOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn test_index_all_skips_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("finance.json"), "not json at all").unwrap();
        write_fixture(dir.path(), Category::Faq, &["q"]);

        let store = Arc::new(MemoryVectorStore::new());
        let indexer = Indexer::new(Arc::new(StubEmbedder), store.clone());

        let outcomes = indexer.index_all(dir.path()).await.unwrap();
        let by_category: std::collections::HashMap<_, _> = outcomes.into_iter().collect();
        assert!(matches!(
            by_category[&Category::Finance],
            IndexOutcome::Skipped(_)
        ));
        assert_eq!(by_category[&Category::Faq], IndexOutcome::Indexed(1));
    }

    #[tokio::test]
    async fn test_rebuild_clears_before_indexing() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), Category::Finance, &["old and new"]);

        let store = Arc::new(MemoryVectorStore::new());
        let indexer = Indexer::new(Arc::new(StubEmbedder), store.clone());
        indexer.index_category(dir.path(), Category::Finance).await.unwrap();

        // Shrink the chunk file, then rebuild: stale records must not linger
        write_fixture(dir.path(), Category::Finance, &["only this"]);
        indexer
            .rebuild_category(dir.path(), Category::Finance)
            .await
            .unwrap();

        assert_eq!(store.record_count().await.unwrap(), 1);
        let results = store
            .search(&[9.0, 1.0], &SearchFilter::any(), 10)
            .await
            .unwrap();
        assert_eq!(results[0].record.text, "only this");
    }
}

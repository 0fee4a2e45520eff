//! Vector store abstraction for Svar.
//!
//! Provides a trait-based interface for different vector database backends.
//! Records are append-only from the pipeline's point of view; re-indexing
//! the same chunk replaces the existing record because ids are
//! deterministic.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::corpus::{Category, ChunkMetadata, DocumentChunk};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chunk stored in the vector database alongside its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedRecord {
    /// Unique record ID, deterministic over (category, source, text).
    pub id: Uuid,
    /// Chunk text.
    pub text: String,
    /// Source and category metadata.
    pub metadata: ChunkMetadata,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this record was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl IndexedRecord {
    /// Create a record from a chunk and its embedding.
    ///
    /// The id is a UUID v5 over the chunk's identity, so indexing the same
    /// chunk twice produces the same id and the second write replaces the
    /// first instead of duplicating it.
    pub fn from_chunk(chunk: &DocumentChunk, embedding: Vec<f32>) -> Self {
        Self {
            id: record_id(chunk),
            text: chunk.text.clone(),
            metadata: chunk.metadata.clone(),
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// Deterministic record id for a chunk.
pub fn record_id(chunk: &DocumentChunk) -> Uuid {
    let name = format!(
        "{}\u{1f}{}\u{1f}{}",
        chunk.metadata.category.as_str(),
        chunk.metadata.source,
        chunk.text
    );
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

/// Metadata filter applied during similarity search.
///
/// `category` matches by exact equality and `sources` by set membership,
/// mirroring how the builder tags chunks. A filter that matches nothing
/// yields zero candidates rather than an error.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Restrict to a single category.
    pub category: Option<Category>,
    /// Restrict to records whose source is in this set. `None` means any
    /// source; an empty set matches nothing.
    pub sources: Option<Vec<String>>,
}

impl SearchFilter {
    /// Filter matching every record.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter on category equality and source membership.
    pub fn for_question(category: Category, sources: Vec<String>) -> Self {
        Self {
            category: Some(category),
            sources: Some(sources),
        }
    }

    /// Whether a record passes this filter.
    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        if let Some(category) = self.category {
            if metadata.category != category {
                return false;
            }
        }
        if let Some(sources) = &self.sources {
            if !sources.iter().any(|s| s == &metadata.source) {
                return false;
            }
        }
        true
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched record.
    pub record: IndexedRecord,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Per-source record counts within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStats {
    /// Category of the records.
    pub category: Category,
    /// Source identifier.
    pub source: String,
    /// Number of indexed records.
    pub record_count: u32,
    /// Most recent indexing time for this source.
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store a batch of records transactionally.
    ///
    /// Either every record in the batch is persisted or none is, so a crash
    /// mid-index never leaves a partially written batch.
    async fn upsert_batch(&self, records: &[IndexedRecord]) -> Result<usize>;

    /// Similarity search restricted by a metadata filter.
    async fn search(
        &self,
        query_embedding: &[f32],
        filter: &SearchFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Delete all records in a category. Returns the number deleted.
    async fn delete_by_category(&self, category: Category) -> Result<usize>;

    /// Per-source record counts, most recently indexed first.
    async fn list_sources(&self) -> Result<Vec<SourceStats>>;

    /// Number of records in a category.
    async fn category_count(&self, category: Category) -> Result<usize>;

    /// Get total record count.
    async fn record_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_record_id_is_deterministic() {
        let chunk = DocumentChunk::new("annual report", "2330", Category::Finance);
        assert_eq!(record_id(&chunk), record_id(&chunk));

        let other = DocumentChunk::new("annual report", "2330", Category::Insurance);
        assert_ne!(record_id(&chunk), record_id(&other));
    }

    #[test]
    fn test_filter_matches() {
        let metadata = ChunkMetadata {
            source: "12".to_string(),
            category: Category::Faq,
        };

        assert!(SearchFilter::any().matches(&metadata));
        assert!(
            SearchFilter::for_question(Category::Faq, vec!["12".to_string()]).matches(&metadata)
        );
        assert!(
            !SearchFilter::for_question(Category::Finance, vec!["12".to_string()])
                .matches(&metadata)
        );
        assert!(
            !SearchFilter::for_question(Category::Faq, vec!["13".to_string()]).matches(&metadata)
        );
        // An empty source set matches nothing
        assert!(!SearchFilter::for_question(Category::Faq, vec![]).matches(&metadata));
    }
}

//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, IndexedRecord, SearchFilter, SearchResult, SourceStats, VectorStore};
use crate::corpus::Category;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    records: RwLock<HashMap<String, IndexedRecord>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, records: &[IndexedRecord]) -> Result<usize> {
        let mut store = self.records.write().unwrap();
        for record in records {
            store.insert(record.id.to_string(), record.clone());
        }
        Ok(records.len())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        filter: &SearchFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let records = self.records.read().unwrap();

        let mut results: Vec<SearchResult> = records
            .values()
            .filter(|record| filter.matches(&record.metadata))
            .map(|record| {
                let score = cosine_similarity(query_embedding, &record.embedding);
                SearchResult {
                    record: record.clone(),
                    score,
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn delete_by_category(&self, category: Category) -> Result<usize> {
        let mut records = self.records.write().unwrap();
        let initial_len = records.len();
        records.retain(|_, record| record.metadata.category != category);
        Ok(initial_len - records.len())
    }

    async fn list_sources(&self) -> Result<Vec<SourceStats>> {
        let records = self.records.read().unwrap();

        let mut source_map: HashMap<(Category, String), SourceStats> = HashMap::new();

        for record in records.values() {
            let key = (record.metadata.category, record.metadata.source.clone());
            let entry = source_map.entry(key).or_insert_with(|| SourceStats {
                category: record.metadata.category,
                source: record.metadata.source.clone(),
                record_count: 0,
                indexed_at: record.indexed_at,
            });

            entry.record_count += 1;
            if record.indexed_at > entry.indexed_at {
                entry.indexed_at = record.indexed_at;
            }
        }

        let mut sources: Vec<SourceStats> = source_map.into_values().collect();
        sources.sort_by(|a, b| b.indexed_at.cmp(&a.indexed_at));

        Ok(sources)
    }

    async fn category_count(&self, category: Category) -> Result<usize> {
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .filter(|r| r.metadata.category == category)
            .count())
    }

    async fn record_count(&self) -> Result<usize> {
        let records = self.records.read().unwrap();
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::DocumentChunk;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        let records = vec![
            IndexedRecord::from_chunk(
                &DocumentChunk::new("Hello world", "src1", Category::Finance),
                vec![1.0, 0.0, 0.0],
            ),
            IndexedRecord::from_chunk(
                &DocumentChunk::new("Goodbye world", "src2", Category::Finance),
                vec![0.0, 1.0, 0.0],
            ),
        ];

        store.upsert_batch(&records).await.unwrap();
        assert_eq!(store.record_count().await.unwrap(), 2);

        let results = store
            .search(&[1.0, 0.0, 0.0], &SearchFilter::any(), 10)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);

        let filter = SearchFilter::for_question(Category::Finance, vec!["src2".to_string()]);
        let results = store.search(&[1.0, 0.0, 0.0], &filter, 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.text, "Goodbye world");

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 2);
    }
}

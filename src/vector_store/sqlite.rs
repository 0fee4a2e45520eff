//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! Metadata filters are pushed into the SQL WHERE clause so only matching
//! rows are scored. For large datasets, consider the sqlite-vec extension
//! or a dedicated vector database.

use super::{cosine_similarity, IndexedRecord, SearchFilter, SearchResult, SourceStats, VectorStore};
use crate::corpus::{Category, ChunkMetadata};
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    source TEXT NOT NULL,
    category TEXT NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_category ON records(category);
CREATE INDEX IF NOT EXISTS idx_records_source ON records(category, source);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Create a new SQLite vector store.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    /// Build the WHERE clause and parameters for a filter.
    fn filter_clause(filter: &SearchFilter) -> (String, Vec<String>) {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        if let Some(category) = filter.category {
            clauses.push("category = ?".to_string());
            values.push(category.as_str().to_string());
        }

        if let Some(sources) = &filter.sources {
            if sources.is_empty() {
                // Empty membership set matches nothing
                clauses.push("1 = 0".to_string());
            } else {
                let placeholders = vec!["?"; sources.len()].join(", ");
                clauses.push(format!("source IN ({})", placeholders));
                values.extend(sources.iter().cloned());
            }
        }

        let clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        (clause, values)
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<IndexedRecord> {
        let id_str: String = row.get(0)?;
        let category_str: String = row.get(3)?;
        let embedding_bytes: Vec<u8> = row.get(4)?;
        let indexed_at_str: String = row.get(5)?;

        Ok(IndexedRecord {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            text: row.get(1)?,
            metadata: ChunkMetadata {
                source: row.get(2)?,
                category: category_str.parse().unwrap_or(Category::Faq),
            },
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert_batch(&self, records: &[IndexedRecord]) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SvarError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let tx = conn.unchecked_transaction()?;

        for record in records {
            let embedding_bytes = Self::embedding_to_bytes(&record.embedding);

            tx.execute(
                r#"
                INSERT OR REPLACE INTO records
                (id, text, source, category, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    record.id.to_string(),
                    record.text,
                    record.metadata.source,
                    record.metadata.category.as_str(),
                    embedding_bytes,
                    record.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} records", records.len());
        Ok(records.len())
    }

    #[instrument(skip(self, query_embedding, filter))]
    async fn search(
        &self,
        query_embedding: &[f32],
        filter: &SearchFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SvarError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let (clause, values) = Self::filter_clause(filter);
        let sql = format!(
            "SELECT id, text, source, category, embedding, indexed_at FROM records {}",
            clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt.query_map(params_from_iter(values.iter()), Self::row_to_record)?;

        let mut results: Vec<SearchResult> = records
            .filter_map(|record| record.ok())
            .map(|record| {
                let score = cosine_similarity(query_embedding, &record.embedding);
                SearchResult { record, score }
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        debug!("Found {} matching records", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn delete_by_category(&self, category: Category) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SvarError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let deleted = conn.execute(
            "DELETE FROM records WHERE category = ?1",
            params![category.as_str()],
        )?;

        info!("Deleted {} records in category {}", deleted, category);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self) -> Result<Vec<SourceStats>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SvarError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT category, source, COUNT(*) as record_count, MAX(indexed_at) as indexed_at
            FROM records
            GROUP BY category, source
            ORDER BY indexed_at DESC
            "#,
        )?;

        let sources = stmt.query_map([], |row| {
            let category_str: String = row.get(0)?;
            let indexed_at_str: String = row.get(3)?;
            Ok(SourceStats {
                category: category_str.parse().unwrap_or(Category::Faq),
                source: row.get(1)?,
                record_count: row.get(2)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let result: Vec<SourceStats> = sources.filter_map(|s| s.ok()).collect();
        Ok(result)
    }

    async fn category_count(&self, category: Category) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SvarError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE category = ?1",
            params![category.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    async fn record_count(&self) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SvarError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

//! Corpus data model: document chunks and their category metadata.
//!
//! Chunks are immutable once built. They are written to one JSON file per
//! category and consumed verbatim by the indexer, so the serialized form is
//! the contract between the builder and everything downstream.

use crate::error::{Result, SvarError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Closed set of document categories.
///
/// Retrieval filters on exact equality of the serialized name, so any new
/// category must be added here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Finance,
    Insurance,
    Faq,
}

impl Category {
    /// All known categories, in build/index order.
    pub const ALL: [Category; 3] = [Category::Finance, Category::Insurance, Category::Faq];

    /// The serialized (lowercase) name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Finance => "finance",
            Category::Insurance => "insurance",
            Category::Faq => "faq",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = SvarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "finance" => Ok(Category::Finance),
            "insurance" => Ok(Category::Insurance),
            "faq" => Ok(Category::Faq),
            other => Err(SvarError::UnknownCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata attached to every chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source identifier (filename stem, folder name, or FAQ key).
    pub source: String,
    /// Category this chunk belongs to.
    pub category: Category,
}

/// A unit of text extracted from a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Chunk text, never empty.
    pub text: String,
    /// Source and category metadata.
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    /// Create a new chunk.
    pub fn new(text: impl Into<String>, source: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            metadata: ChunkMetadata {
                source: source.into(),
                category,
            },
        }
    }
}

/// Path of a category's chunk file under the documents directory.
pub fn category_path(documents_dir: &Path, category: Category) -> PathBuf {
    documents_dir.join(format!("{}.json", category.as_str()))
}

/// Write a category's chunks as a pretty-printed JSON array.
///
/// Overwrites any previous file: a rebuild is always a full rebuild.
pub fn write_chunks(documents_dir: &Path, category: Category, chunks: &[DocumentChunk]) -> Result<()> {
    std::fs::create_dir_all(documents_dir)?;
    let path = category_path(documents_dir, category);
    let json = serde_json::to_vec_pretty(chunks)?;
    std::fs::write(&path, json)?;
    Ok(())
}

/// Read a category's chunks back from disk.
pub fn read_chunks(documents_dir: &Path, category: Category) -> Result<Vec<DocumentChunk>> {
    let path = category_path(documents_dir, category);
    let content = std::fs::read(&path)?;
    let chunks: Vec<DocumentChunk> = serde_json::from_slice(&content)?;
    Ok(chunks)
}

//! Svar - Document RAG pipeline
//!
//! A local-first CLI tool for building a searchable knowledge base from
//! domain documents and answering questions against it.
//!
//! The name "Svar" comes from the Norwegian/Scandinavian word for "answer."
//!
//! # Overview
//!
//! Svar allows you to:
//! - Chunk finance reports, insurance manuals, and FAQ collections into
//!   uniform JSON records
//! - Embed the chunks and store them in a persistent vector database
//! - Answer question batches with filtered retrieval, reranking, and a
//!   chat model
//! - Search the indexed corpus semantically
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `corpus` - Chunk records and category metadata
//! - `builder` - Per-category document chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `indexer` - Embedding and storing chunk files
//! - `rerank` - Candidate reranking
//! - `chat` - Chat completion
//! - `rag` - Question answering with checkpointed output
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use svar::config::Settings;
//! use svar::embedding::OpenAIEmbedder;
//! use svar::indexer::Indexer;
//! use svar::vector_store::SqliteVectorStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let store = Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?);
//!     let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding));
//!
//!     let indexer = Indexer::new(embedder, store);
//!     let outcomes = indexer.index_all(&settings.documents_dir()).await?;
//!     println!("Indexed {} categories", outcomes.len());
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod chat;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod openai;
pub mod rag;
pub mod rerank;
pub mod vector_store;

pub use error::{Result, SvarError};

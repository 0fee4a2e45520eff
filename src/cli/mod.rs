//! CLI module for Svar.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Svar - Document RAG pipeline
///
/// A local-first CLI tool for building a searchable knowledge base from
/// domain documents and answering questions against it. The name "Svar"
/// comes from the Norwegian/Scandinavian word for "answer."
#[derive(Parser, Debug)]
#[command(name = "svar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Svar and write the default configuration
    Init,

    /// Check configuration, corpora, and the vector store
    Doctor,

    /// Build chunk JSON files from the raw corpora
    Build {
        /// Category to build (finance, insurance, faq); all by default
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// Embed chunk files and store them in the vector database
    Index {
        /// Category to index (finance, insurance, faq); all by default
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Delete the category's existing records before indexing
        #[arg(long)]
        rebuild: bool,
    },

    /// Answer a batch of questions from a questions JSON file
    Answer {
        /// Path to the questions file ({"questions": [...]})
        questions: String,

        /// Output file for the answers
        #[arg(short, long, default_value = "answers.json")]
        output: String,

        /// Skip questions already answered in the output file
        #[arg(long)]
        resume: bool,
    },

    /// Ask a single ad-hoc question
    Ask {
        /// The question to ask
        question: String,

        /// Category to search within
        #[arg(short = 'C', long)]
        category: String,

        /// Source ids to restrict retrieval to (repeatable); all sources
        /// in the category if omitted
        #[arg(short, long)]
        source: Vec<String>,
    },

    /// Search for relevant chunks without generating an answer
    Search {
        /// Search query
        query: String,

        /// Category to search within; all categories if omitted
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// List indexed sources and record counts
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "generation.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Show configuration file path
    Path,
}

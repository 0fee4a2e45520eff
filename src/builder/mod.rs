//! Document builders: raw corpora in, uniform chunk records out.
//!
//! Each category has its own splitting rules. The builders are pure with
//! respect to the vector store: they only read source files and write one
//! JSON array per category under the documents directory.

mod faq;
mod finance;
mod insurance;

pub use faq::build_faq;
pub use finance::build_finance;
pub use insurance::build_insurance;

use crate::config::Settings;
use crate::corpus::{self, Category, DocumentChunk};
use crate::error::Result;
use tracing::info;

/// Whether a chunk should be treated as a markdown table.
///
/// A chunk containing both `|` and `-` is routed to the table branch,
/// never to the prose branch.
pub fn is_table(chunk: &str) -> bool {
    chunk.contains('|') && chunk.contains('-')
}

/// Build one category's chunks from its configured source location.
pub fn build_category(settings: &Settings, category: Category) -> Result<Vec<DocumentChunk>> {
    match category {
        Category::Finance => build_finance(&settings.finance_dir()),
        Category::Insurance => build_insurance(&settings.insurance_dir()),
        Category::Faq => build_faq(&settings.faq_file()),
    }
}

/// Build a category and write its chunk file, returning the chunk count.
pub fn build_and_write(settings: &Settings, category: Category) -> Result<usize> {
    let chunks = build_category(settings, category)?;
    corpus::write_chunks(&settings.documents_dir(), category, &chunks)?;
    info!("Built {} {} chunks", chunks.len(), category);
    Ok(chunks.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_classification() {
        assert!(is_table("| year | revenue |\n|------|---------|"));
        assert!(is_table("a - b | c"));
        assert!(!is_table("plain prose with - a dash"));
        assert!(!is_table("pipe | only"));
        assert!(!is_table("no markers at all"));
    }
}

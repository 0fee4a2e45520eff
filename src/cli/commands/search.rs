//! Search command implementation.

use super::{build_embedder, build_reranker, open_store};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::Category;
use crate::rag::Retriever;
use crate::vector_store::SearchFilter;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    category: Option<&str>,
    limit: usize,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let store = open_store(&settings)?;
    let embedder = build_embedder(&settings);
    let reranker = build_reranker(&settings, embedder.clone())?;
    let retriever = Retriever::new(store, embedder, reranker);

    let filter = SearchFilter {
        category: category.map(str::parse::<Category>).transpose()?,
        sources: None,
    };

    let spinner = Output::spinner("Searching...");

    let results = retriever.search(query, &filter, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) => {
            if results.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                Output::success(&format!("Found {} results", results.len()));

                for result in &results {
                    Output::search_result(
                        result.record.metadata.category.as_str(),
                        &result.record.metadata.source,
                        result.score,
                        &result.record.text,
                    );
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}

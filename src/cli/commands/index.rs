//! Index command implementation.

use super::{build_embedder, open_store, parse_categories};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::SvarError;
use crate::indexer::Indexer;
use anyhow::Result;

/// Run the index command.
pub async fn run_index(category: Option<&str>, rebuild: bool, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Index, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let store = open_store(&settings)?;
    let embedder = build_embedder(&settings);
    let indexer = Indexer::new(embedder, store);
    let documents_dir = settings.documents_dir();

    let categories = parse_categories(category)?;

    for category in categories {
        let spinner = Output::spinner(&format!("Indexing {}...", category));

        let result = if rebuild {
            indexer.rebuild_category(&documents_dir, category).await
        } else {
            indexer.index_category(&documents_dir, category).await
        };

        spinner.finish_and_clear();

        match result {
            Ok(count) => {
                Output::success(&format!("{}: {} records indexed", category, count));
            }
            // A missing or malformed chunk file for one category shouldn't
            // stop the rest; store and API errors still abort the run
            Err(e @ (SvarError::Io(_) | SvarError::Json(_))) => {
                Output::warning(&format!("Skipped {}: {}", category, e));
            }
            Err(e) => {
                Output::error(&format!("Indexing {} failed: {}", category, e));
                return Err(e.into());
            }
        }
    }

    Ok(())
}

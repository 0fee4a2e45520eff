//! Ask command implementation: a single ad-hoc question.

use super::build_engine;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::Category;
use crate::rag::Question;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    category: &str,
    sources: &[String],
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Answer, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let category: Category = category.parse()?;
    let engine = build_engine(&settings)?;

    // An empty source list would match nothing; fall back to every indexed
    // source in the category
    let sources = if sources.is_empty() {
        let store = super::open_store(&settings)?;
        store
            .list_sources()
            .await?
            .into_iter()
            .filter(|s| s.category == category)
            .map(|s| s.source)
            .collect()
    } else {
        sources.to_vec()
    };

    let question = Question {
        qid: 0,
        query: question.to_string(),
        source: sources,
        category,
    };

    let spinner = Output::spinner("Searching knowledge base...");

    match engine.answer(&question).await {
        Ok(answer) => {
            spinner.finish_and_clear();

            println!("\n{}\n", answer.generate);

            let documents = answer.documents();
            if !documents.is_empty() {
                Output::header("Sources");
                for document in documents {
                    let preview: String =
                        document.replace('\n', " ").chars().take(120).collect();
                    Output::list_item(&preview);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

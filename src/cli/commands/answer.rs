//! Answer command implementation: batch question answering.

use super::build_engine;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::{self, AnswerEngine, AnswerWriter, QuestionSet};
use anyhow::Result;
use std::path::Path;
use tracing::warn;

/// Run the answer command.
pub async fn run_answer(
    questions_path: &str,
    output_path: &str,
    resume: bool,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Answer, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let set = QuestionSet::load(Path::new(questions_path))?;
    rag::check_unique_qids(&set.questions)?;
    Output::info(&format!("Loaded {} questions", set.questions.len()));

    let engine = build_engine(&settings)?;
    let mut writer = AnswerWriter::open(Path::new(output_path), resume)?;

    if resume && !writer.is_empty() {
        Output::info(&format!(
            "Resuming: {} answers already in {}",
            writer.len(),
            output_path
        ));
    }

    let pb = Output::progress_bar(set.questions.len() as u64, "Answering questions");
    let mut failures = 0usize;

    for question in &set.questions {
        if writer.contains(question.qid) {
            pb.inc(1);
            continue;
        }

        // One bad question leaves a marker in the output; the batch goes on
        let answer = match engine.answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Answering qid {} failed: {}", question.qid, e);
                failures += 1;
                AnswerEngine::error_answer(question, &e)
            }
        };

        writer.push(answer)?;
        pb.inc(1);
    }

    pb.finish_and_clear();

    if failures > 0 {
        Output::warning(&format!(
            "{} of {} questions failed; their answers carry an [error] marker",
            failures,
            set.questions.len()
        ));
    }
    Output::success(&format!(
        "Wrote {} answers to {}",
        writer.len(),
        output_path
    ));

    Ok(())
}

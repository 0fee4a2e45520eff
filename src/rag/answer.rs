//! Answer generation and checkpointed batch output.

use super::{Answer, AnswerSet, Question, Retriever};
use crate::chat::ChatModel;
use crate::config::Prompts;
use crate::error::{Result, SvarError};
use crate::vector_store::SearchFilter;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Generates answers for questions via retrieve -> rerank -> chat.
pub struct AnswerEngine {
    retriever: Retriever,
    chat: Arc<dyn ChatModel>,
    prompts: Prompts,
    temperature: f32,
}

impl AnswerEngine {
    /// Create a new answer engine.
    pub fn new(retriever: Retriever, chat: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever,
            chat,
            prompts: Prompts::default(),
            temperature: 0.0,
        }
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Answer one question.
    ///
    /// Zero retrieved candidates short-circuits to the canned no-context
    /// reply without a model call.
    #[instrument(skip(self, question), fields(qid = question.qid))]
    pub async fn answer(&self, question: &Question) -> Result<Answer> {
        let filter = SearchFilter::for_question(question.category, question.source.clone());
        let passages = self.retriever.retrieve(&question.query, &filter).await?;

        if passages.is_empty() {
            info!("No context for qid {}; returning canned reply", question.qid);
            return Ok(Answer::new(
                question.qid,
                &[],
                self.prompts.answer.no_context.clone(),
            ));
        }

        let texts: Vec<String> = passages.into_iter().map(|p| p.text).collect();
        let context = texts.join("\n\n");

        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context);
        vars.insert("query".to_string(), question.query.clone());
        let user_prompt = Prompts::render(&self.prompts.answer.user, &vars);

        let generate = self
            .chat
            .complete(&self.prompts.answer.system, &user_prompt, self.temperature)
            .await?;

        Ok(Answer::new(question.qid, &texts, generate))
    }

    /// An error placeholder for a question whose answer attempt failed.
    ///
    /// Keeps the batch going and leaves a marker in the output instead of
    /// discarding everything answered so far.
    pub fn error_answer(question: &Question, error: &SvarError) -> Answer {
        Answer::new(question.qid, &[], format!("[error] {}", error))
    }
}

/// Checkpointed writer for the answers output file.
///
/// The file is rewritten atomically (temp file + rename) after every
/// answer, so a crash loses at most the in-flight question. With `resume`,
/// qids already present in an existing output file are kept and skipped.
pub struct AnswerWriter {
    path: PathBuf,
    set: AnswerSet,
}

impl AnswerWriter {
    /// Open a writer, loading prior answers when resuming.
    pub fn open(path: &Path, resume: bool) -> Result<Self> {
        let set = if resume && path.exists() {
            let content = std::fs::read(path)?;
            serde_json::from_slice(&content)?
        } else {
            AnswerSet::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            set,
        })
    }

    /// Whether a qid has already been answered.
    pub fn contains(&self, qid: i64) -> bool {
        self.set.answers.iter().any(|a| a.qid == qid)
    }

    /// Number of answers written so far.
    pub fn len(&self) -> usize {
        self.set.answers.len()
    }

    /// Whether no answers have been written.
    pub fn is_empty(&self) -> bool {
        self.set.answers.is_empty()
    }

    /// Append an answer and rewrite the output file.
    pub fn push(&mut self, answer: Answer) -> Result<()> {
        self.set.answers.push(answer);
        self.flush()
    }

    /// Rewrite the output file atomically.
    fn flush(&self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let json = serde_json::to_vec_pretty(&self.set)?;
        let tmp = tempfile::NamedTempFile::new_in(parent)?;
        std::fs::write(tmp.path(), json)?;
        tmp.persist(&self.path)
            .map_err(|e| SvarError::Io(e.error))?;
        Ok(())
    }

    /// The accumulated answer set.
    pub fn answers(&self) -> &AnswerSet {
        &self.set
    }
}

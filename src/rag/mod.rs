//! RAG (Retrieval-Augmented Generation) for batch question answering.
//!
//! Wires the pipeline's query side together: embed the question, run a
//! filtered similarity search, rerank, and generate an answer grounded in
//! the top passages.

mod answer;
mod retrieval;

pub use answer::{AnswerEngine, AnswerWriter};
pub use retrieval::Retriever;

use crate::corpus::Category;
use crate::error::{Result, SvarError};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// An incoming question with its retrieval constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Question id, unique within a batch.
    pub qid: i64,
    /// The query text.
    pub query: String,
    /// Source ids the answer may draw from. The input file may carry these
    /// as JSON numbers or strings; both are accepted.
    #[serde(deserialize_with = "source_ids")]
    pub source: Vec<String>,
    /// Category to search within.
    pub category: Category,
}

/// The questions input file: `{ "questions": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

impl QuestionSet {
    /// Load a question set from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read(path)?;
        let set: QuestionSet = serde_json::from_slice(&content)?;
        Ok(set)
    }
}

/// One answered question: the generated answer plus the four passages it
/// was grounded in. Missing passage slots stay empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub qid: i64,
    #[serde(rename = "Document1")]
    pub document1: String,
    #[serde(rename = "Document2")]
    pub document2: String,
    #[serde(rename = "Document3")]
    pub document3: String,
    #[serde(rename = "Document4")]
    pub document4: String,
    pub generate: String,
}

impl Answer {
    /// Build an answer from up to four passages and the generated text.
    pub fn new(qid: i64, passages: &[String], generate: String) -> Self {
        let slot = |i: usize| passages.get(i).cloned().unwrap_or_default();
        Self {
            qid,
            document1: slot(0),
            document2: slot(1),
            document3: slot(2),
            document4: slot(3),
            generate,
        }
    }

    /// The non-empty passage slots, in rank order.
    pub fn documents(&self) -> Vec<&str> {
        [
            self.document1.as_str(),
            self.document2.as_str(),
            self.document3.as_str(),
            self.document4.as_str(),
        ]
        .into_iter()
        .filter(|d| !d.is_empty())
        .collect()
    }
}

/// The answers output file: `{ "answers": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerSet {
    pub answers: Vec<Answer>,
}

/// Accept source ids as JSON numbers or strings.
fn source_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SourceId {
        Number(i64),
        Text(String),
    }

    let raw: Vec<SourceId> = Vec::deserialize(deserializer)?;
    raw.into_iter()
        .map(|id| match id {
            SourceId::Number(n) => Ok(n.to_string()),
            SourceId::Text(s) if !s.is_empty() => Ok(s),
            SourceId::Text(_) => Err(D::Error::custom("empty source id")),
        })
        .collect()
}

/// Validate that a batch has no duplicate qids.
pub fn check_unique_qids(questions: &[Question]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for question in questions {
        if !seen.insert(question.qid) {
            return Err(SvarError::InvalidInput(format!(
                "Duplicate qid in question set: {}",
                question.qid
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_sources_accept_numbers_and_strings() {
        let json = r#"{
            "questions": [
                {"qid": 1, "query": "What changed?", "source": [442, 115, 440], "category": "finance"},
                {"qid": 2, "query": "How to claim?", "source": ["A7", "B2"], "category": "insurance"}
            ]
        }"#;

        let set: QuestionSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.questions[0].source, vec!["442", "115", "440"]);
        assert_eq!(set.questions[1].source, vec!["A7", "B2"]);
        assert_eq!(set.questions[1].category, Category::Insurance);
    }

    #[test]
    fn test_answer_serialized_key_names() {
        let answer = Answer::new(
            9,
            &["first".to_string(), "second".to_string()],
            "the answer".to_string(),
        );
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["qid"], 9);
        assert_eq!(json["Document1"], "first");
        assert_eq!(json["Document2"], "second");
        assert_eq!(json["Document3"], "");
        assert_eq!(json["Document4"], "");
        assert_eq!(json["generate"], "the answer");
    }

    #[test]
    fn test_answer_documents_skips_empty_slots() {
        let answer = Answer::new(1, &["only".to_string()], "a".to_string());
        assert_eq!(answer.documents(), vec!["only"]);
    }

    #[test]
    fn test_duplicate_qids_rejected() {
        let question = Question {
            qid: 3,
            query: "q".to_string(),
            source: vec!["1".to_string()],
            category: Category::Faq,
        };
        let questions = vec![question.clone(), question];
        assert!(check_unique_qids(&questions).is_err());
    }
}

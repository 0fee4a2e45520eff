//! FAQ builder.
//!
//! The FAQ source is a single JSON object keyed by source id, each value a
//! list of question/answer entries. One entry becomes one chunk: the
//! question followed by its answers, newline-joined.

use crate::corpus::{Category, DocumentChunk};
use crate::error::{Result, SvarError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::instrument;

/// One question/answer entry in the FAQ source.
#[derive(Debug, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answers: Vec<String>,
}

/// Build FAQ chunks from the source JSON file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn build_faq(path: &Path) -> Result<Vec<DocumentChunk>> {
    if !path.is_file() {
        return Err(SvarError::Builder(format!(
            "FAQ file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read(path)?;
    // BTreeMap keeps source order stable across rebuilds
    let sources: BTreeMap<String, Vec<FaqEntry>> = serde_json::from_slice(&content)?;

    let mut documents = Vec::new();
    for (source, entries) in sources {
        for entry in entries {
            let text = format!("{}\n{}", entry.question, entry.answers.join("\n"));
            documents.push(DocumentChunk::new(text, source.clone(), Category::Faq));
        }
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_faq() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.json");
        std::fs::write(
            &path,
            r#"{
                "12": [
                    {"question": "How do I reset my password?", "answers": ["Use the reset link.", "Contact support if it fails."]}
                ],
                "7": [
                    {"question": "What is the annual fee?", "answers": ["There is no annual fee."]}
                ]
            }"#,
        )
        .unwrap();

        let chunks = build_faq(&path).unwrap();
        assert_eq!(chunks.len(), 2);

        let reset = chunks
            .iter()
            .find(|c| c.metadata.source == "12")
            .unwrap();
        assert_eq!(
            reset.text,
            "How do I reset my password?\nUse the reset link.\nContact support if it fails."
        );
        for chunk in &chunks {
            assert_eq!(chunk.metadata.category, Category::Faq);
            assert!(!chunk.text.is_empty());
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(build_faq(Path::new("/nonexistent/faq.json")).is_err());
    }
}

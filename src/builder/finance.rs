//! Finance report builder.
//!
//! Finance markdown files carry a `[sep]`-delimited structure: the first
//! segment is a header describing the report, the rest is content. Content
//! splits into blank-line chunks; table chunks are emitted after prose
//! chunks, and every chunk is prefixed with the file's header so each
//! record stands on its own at retrieval time.

use super::is_table;
use crate::corpus::{Category, DocumentChunk};
use crate::error::{Result, SvarError};
use std::path::Path;
use tracing::{debug, instrument};

/// Delimiter between the header and content segments of a finance file.
const SEGMENT_DELIMITER: &str = "[sep]";

/// Build finance chunks from a directory of markdown files.
///
/// The source id is the filename up to the first `.` or `_` (e.g.
/// `1001_annual.md` -> `1001`).
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn build_finance(dir: &Path) -> Result<Vec<DocumentChunk>> {
    if !dir.is_dir() {
        return Err(SvarError::Builder(format!(
            "Finance markdown directory not found: {}",
            dir.display()
        )));
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let mut documents = Vec::new();

    for path in entries {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let source = source_id(file_name);
        let content = std::fs::read_to_string(&path)?;

        documents.extend(chunk_file(&content, &source));
        debug!("Processed finance file {}", file_name);
    }

    Ok(documents)
}

/// Source id from a filename: everything before the first `.`, then before
/// the first `_`.
fn source_id(file_name: &str) -> String {
    file_name
        .split('.')
        .next()
        .unwrap_or_default()
        .split('_')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Split one file's content into header-prefixed chunk records.
pub fn chunk_file(content: &str, source: &str) -> Vec<DocumentChunk> {
    let mut segments = content.split(SEGMENT_DELIMITER);
    let head = segments.next().unwrap_or_default().trim();

    let mut prose = Vec::new();
    let mut tables = Vec::new();

    for segment in segments {
        for chunk in segment.split("\n\n") {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            if is_table(chunk) {
                tables.push(chunk);
            } else {
                prose.push(chunk);
            }
        }
    }

    // Prose first, then tables, each carrying the header prefix
    prose
        .into_iter()
        .chain(tables)
        .map(|chunk| {
            DocumentChunk::new(format!("{}\n{}", head, chunk), source, Category::Finance)
        })
        .collect()
}

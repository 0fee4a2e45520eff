//! Insurance manual builder.
//!
//! Insurance manuals arrive as one folder per source, each holding markdown
//! files. Headings and images are noise for retrieval and get stripped
//! before the text is split into paragraph chunks.

use crate::corpus::{Category, DocumentChunk};
use crate::error::{Result, SvarError};
use regex::Regex;
use std::path::Path;
use tracing::{debug, instrument};

/// Build insurance chunks from a directory of per-source folders.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn build_insurance(dir: &Path) -> Result<Vec<DocumentChunk>> {
    if !dir.is_dir() {
        return Err(SvarError::Builder(format!(
            "Insurance markdown directory not found: {}",
            dir.display()
        )));
    }

    let headings = Regex::new(r"(?m)^#+.*$").expect("valid regex");
    let images = Regex::new(r"!\[.*?\]\(.*?\)").expect("valid regex");
    let newlines = Regex::new(r"\n{2,}").expect("valid regex");

    let mut folders: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let mut documents = Vec::new();

    for folder in folders {
        let source = folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let mut files: Vec<_> = std::fs::read_dir(&folder)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
            .collect();
        files.sort();

        for path in files {
            let content = std::fs::read_to_string(&path)?;
            documents.extend(
                clean_and_split(&content, &headings, &images, &newlines)
                    .into_iter()
                    .map(|text| DocumentChunk::new(text, source.clone(), Category::Insurance)),
            );
        }

        debug!("Processed insurance folder {}", source);
    }

    Ok(documents)
}

/// Strip headings and images, normalize blank lines, and split into
/// paragraph chunks.
fn clean_and_split(content: &str, headings: &Regex, images: &Regex, newlines: &Regex) -> Vec<String> {
    let text = headings.replace_all(content, "");
    let text = images.replace_all(&text, "");
    let text = newlines.replace_all(&text, "\n\n");
    let text = text.trim();

    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(content: &str) -> Vec<String> {
        let headings = Regex::new(r"(?m)^#+.*$").unwrap();
        let images = Regex::new(r"!\[.*?\]\(.*?\)").unwrap();
        let newlines = Regex::new(r"\n{2,}").unwrap();
        clean_and_split(content, &headings, &images, &newlines)
    }

    #[test]
    fn test_strips_headings_and_images() {
        let content = "# Policy Terms\n\nCoverage starts on day one.\n\n![diagram](img/flow.png)\n\nClaims must be filed within 30 days.\n";
        let paragraphs = split(content);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0], "Coverage starts on day one.");
        assert_eq!(paragraphs[1], "Claims must be filed within 30 days.");
    }

    #[test]
    fn test_compresses_blank_line_runs() {
        let content = "first paragraph\n\n\n\n\nsecond paragraph\n";
        let paragraphs = split(content);
        assert_eq!(paragraphs, vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn test_all_noise_yields_no_chunks() {
        let content = "# Title\n## Subtitle\n![img](a.png)\n";
        assert!(split(content).is_empty());
    }

    #[test]
    fn test_build_walks_source_folders() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("policyA");
        std::fs::create_dir(&folder).unwrap();
        std::fs::write(folder.join("terms.md"), "# T\n\nParagraph one.\n\nParagraph two.\n")
            .unwrap();
        std::fs::write(folder.join("notes.txt"), "ignored, not markdown").unwrap();

        let chunks = build_insurance(dir.path()).unwrap();
        assert_eq!(chunks.len(), 2);
        for chunk in &chunks {
            assert_eq!(chunk.metadata.source, "policyA");
            assert_eq!(chunk.metadata.category, Category::Insurance);
            assert!(!chunk.text.is_empty());
        }
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        assert!(build_insurance(Path::new("/nonexistent/insurance")).is_err());
    }
}

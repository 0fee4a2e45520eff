//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, SvarError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Building chunk files needs no credentials.
    Build,
    /// Indexing requires an embedding API key.
    Index,
    /// Answering requires an embedding API key and a chat endpoint.
    Answer,
    /// Search requires an embedding API key.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Build => {}
        Operation::Index | Operation::Search => {
            check_api_key(settings.embedding.api_base.as_deref())?;
        }
        Operation::Answer => {
            check_api_key(settings.embedding.api_base.as_deref())?;
            // A local chat endpoint needs no key; the hosted API does
            if settings.generation.api_base.is_none() {
                check_api_key(None)?;
            }
        }
    }
    Ok(())
}

/// Check if the OpenAI API key is configured.
///
/// Skipped when an api_base override points at a local server, which
/// typically runs unauthenticated.
fn check_api_key(api_base: Option<&str>) -> Result<()> {
    if api_base.is_some() {
        return Ok(());
    }

    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SvarError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(SvarError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_has_no_requirements() {
        let settings = Settings::default();
        assert!(check(Operation::Build, &settings).is_ok());
    }

    #[test]
    fn test_local_api_base_skips_key_check() {
        assert!(check_api_key(Some("http://localhost:11434/v1")).is_ok());
    }
}

//! Configuration settings for Svar.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub corpus: CorpusSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub rerank: RerankSettings,
    pub generation: GenerationSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.svar".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Locations of the raw corpora and the intermediate chunk files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    /// Directory of finance markdown files.
    pub finance_dir: String,
    /// Directory of per-source insurance folders containing markdown files.
    pub insurance_dir: String,
    /// FAQ JSON file keyed by source id.
    pub faq_file: String,
    /// Output directory for per-category chunk JSON files.
    pub documents_dir: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            finance_dir: "~/.svar/corpus/finance_markdown".to_string(),
            insurance_dir: "~/.svar/corpus/insurance_markdown".to_string(),
            faq_file: "~/.svar/corpus/faq.json".to_string(),
            documents_dir: "~/.svar/documents".to_string(),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Number of texts per embedding request.
    pub batch_size: usize,
    /// Optional OpenAI-compatible API base URL (for local servers).
    pub api_base: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            batch_size: 200,
            api_base: None,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider (sqlite, memory).
    pub provider: String,
    /// Path to SQLite database (for sqlite provider).
    pub sqlite_path: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_string(),
            sqlite_path: "~/.svar/vectors.db".to_string(),
        }
    }
}

/// Reranking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankSettings {
    /// Reranker provider (http, embedding).
    pub provider: String,
    /// Rerank API endpoint (for http provider).
    pub endpoint: String,
    /// Reranker model name (for http provider).
    pub model: String,
    /// Number of candidates to retrieve before reranking.
    pub candidates: usize,
    /// Number of passages to keep after reranking.
    pub top_n: usize,
}

impl Default for RerankSettings {
    fn default() -> Self {
        Self {
            provider: "http".to_string(),
            endpoint: "https://api.jina.ai/v1/rerank".to_string(),
            model: "jina-reranker-v2-base-multilingual".to_string(),
            candidates: 30,
            top_n: 4,
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Chat model for answer generation.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional OpenAI-compatible API base URL (e.g. an Ollama endpoint).
    pub api_base: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            api_base: None,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Override for the answer system instruction.
    pub system: Option<String>,
    /// Override for the answer prompt template.
    pub template: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SvarError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("svar")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded finance markdown directory.
    pub fn finance_dir(&self) -> PathBuf {
        Self::expand_path(&self.corpus.finance_dir)
    }

    /// Get the expanded insurance markdown directory.
    pub fn insurance_dir(&self) -> PathBuf {
        Self::expand_path(&self.corpus.insurance_dir)
    }

    /// Get the expanded FAQ JSON path.
    pub fn faq_file(&self) -> PathBuf {
        Self::expand_path(&self.corpus.faq_file)
    }

    /// Get the expanded documents directory.
    pub fn documents_dir(&self) -> PathBuf {
        Self::expand_path(&self.corpus.documents_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.sqlite_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.embedding.batch_size, 200);
        assert_eq!(settings.rerank.candidates, 30);
        assert_eq!(settings.rerank.top_n, 4);
        assert_eq!(settings.generation.temperature, 0.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.embedding.model, settings.embedding.model);
        assert_eq!(parsed.rerank.endpoint, settings.rerank.endpoint);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Settings = toml::from_str("[generation]\nmodel = \"llama3\"\n").unwrap();
        assert_eq!(parsed.generation.model, "llama3");
        assert_eq!(parsed.embedding.batch_size, 200);
    }
}

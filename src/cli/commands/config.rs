//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            set_value(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a dotted-key assignment to the settings.
fn set_value(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.data_dir" => settings.general.data_dir = value.to_string(),
        "general.log_level" => settings.general.log_level = value.to_string(),
        "corpus.finance_dir" => settings.corpus.finance_dir = value.to_string(),
        "corpus.insurance_dir" => settings.corpus.insurance_dir = value.to_string(),
        "corpus.faq_file" => settings.corpus.faq_file = value.to_string(),
        "corpus.documents_dir" => settings.corpus.documents_dir = value.to_string(),
        "embedding.model" => settings.embedding.model = value.to_string(),
        "embedding.dimensions" => settings.embedding.dimensions = value.parse()?,
        "embedding.batch_size" => settings.embedding.batch_size = value.parse()?,
        "embedding.api_base" => settings.embedding.api_base = Some(value.to_string()),
        "vector_store.provider" => settings.vector_store.provider = value.to_string(),
        "vector_store.sqlite_path" => settings.vector_store.sqlite_path = value.to_string(),
        "rerank.provider" => settings.rerank.provider = value.to_string(),
        "rerank.endpoint" => settings.rerank.endpoint = value.to_string(),
        "rerank.model" => settings.rerank.model = value.to_string(),
        "rerank.candidates" => settings.rerank.candidates = value.parse()?,
        "rerank.top_n" => settings.rerank.top_n = value.parse()?,
        "generation.model" => settings.generation.model = value.to_string(),
        "generation.temperature" => settings.generation.temperature = value.parse()?,
        "generation.api_base" => settings.generation.api_base = Some(value.to_string()),
        other => {
            return Err(anyhow::anyhow!(
                "Unknown config key: {}. Run 'svar config show' to see available keys.",
                other
            ))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_keys() {
        let mut settings = Settings::default();
        set_value(&mut settings, "generation.model", "llama3").unwrap();
        assert_eq!(settings.generation.model, "llama3");

        set_value(&mut settings, "rerank.top_n", "6").unwrap();
        assert_eq!(settings.rerank.top_n, 6);
    }

    #[test]
    fn test_set_unknown_key_fails() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "nope.nope", "x").is_err());
    }

    #[test]
    fn test_set_bad_number_fails() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "embedding.dimensions", "large").is_err());
    }
}

//! Prompt templates for Svar.
//!
//! The answer prompt can be overridden through the `[prompts]` config section.

use serde::{Deserialize, Serialize};

/// Collection of all prompt templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub answer: AnswerPrompts,
}

/// Prompts for answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    pub system: String,
    pub user: String,
    /// Canned reply used when retrieval produces no context at all.
    pub no_context: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            system: r#"If you don't know the answer, reply "I don't know"."#.to_string(),

            user: r#"Context information is below.
---------------------
{{context}}
---------------------
Given the context information and not prior knowledge, answer the query.
Query: {{query}}
Answer:
"#
            .to_string(),

            no_context: "I don't know".to_string(),
        }
    }
}

impl Prompts {
    /// Build prompts from settings, applying any configured overrides.
    pub fn from_settings(settings: &crate::config::PromptSettings) -> Self {
        let mut prompts = Prompts::default();
        if let Some(system) = &settings.system {
            prompts.answer.system = system.clone();
        }
        if let Some(template) = &settings.template {
            prompts.answer.user = template.clone();
        }
        prompts
    }

    /// Render a prompt template, replacing {{variable}} placeholders.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.answer.system.contains("I don't know"));
        assert!(prompts.answer.user.contains("{{context}}"));
        assert!(prompts.answer.user.contains("{{query}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Query: {{query}}\nContext: {{context}}";
        let mut vars = std::collections::HashMap::new();
        vars.insert("query".to_string(), "What is the fee?".to_string());
        vars.insert("context".to_string(), "The fee is 3%.".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Query: What is the fee?\nContext: The fee is 3%.");
    }

    #[test]
    fn test_overrides_from_settings() {
        let settings = crate::config::PromptSettings {
            system: Some("Answer briefly.".to_string()),
            template: None,
        };
        let prompts = Prompts::from_settings(&settings);
        assert_eq!(prompts.answer.system, "Answer briefly.");
        assert!(prompts.answer.user.contains("{{context}}"));
    }
}

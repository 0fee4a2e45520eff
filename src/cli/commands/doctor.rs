//! Doctor command - verify configuration and pipeline state.

use super::open_store;
use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::Category;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Svar Doctor");
    println!();
    println!("Checking configuration and pipeline state...\n");

    let mut checks = Vec::new();

    // Check API keys
    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key(settings);
    api_check.print();
    checks.push(api_check);

    println!();

    // Check corpora and documents
    println!("{}", style("Corpora").bold());
    let corpus_checks = check_corpora(settings);
    for check in &corpus_checks {
        check.print();
    }
    checks.extend(corpus_checks);

    println!();

    // Check vector store
    println!("{}", style("Vector Store").bold());
    let store_checks = check_store(settings).await;
    for check in &store_checks {
        check.print();
    }
    checks.extend(store_checks);

    println!();

    // Check configuration
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Svar.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Svar is ready to use.");
    }

    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_api_key(settings: &Settings) -> CheckResult {
    if settings.embedding.api_base.is_some() && settings.generation.api_base.is_some() {
        return CheckResult::ok("API endpoints", "using local api_base overrides");
    }

    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check corpus sources and built chunk files.
fn check_corpora(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for (name, present, path) in [
        (
            "Finance source",
            settings.finance_dir().is_dir(),
            settings.finance_dir(),
        ),
        (
            "Insurance source",
            settings.insurance_dir().is_dir(),
            settings.insurance_dir(),
        ),
        ("FAQ source", settings.faq_file().is_file(), settings.faq_file()),
    ] {
        if present {
            results.push(CheckResult::ok(name, &format!("{}", path.display())));
        } else {
            results.push(CheckResult::warning(
                name,
                &format!("{} (missing)", path.display()),
                "Configure under [corpus] before running 'svar build'",
            ));
        }
    }

    let documents_dir = settings.documents_dir();
    let built: Vec<&str> = Category::ALL
        .iter()
        .filter(|c| crate::corpus::category_path(&documents_dir, **c).is_file())
        .map(|c| c.as_str())
        .collect();

    if built.is_empty() {
        results.push(CheckResult::warning(
            "Chunk files",
            "none built yet",
            "Run 'svar build' to create them",
        ));
    } else {
        results.push(CheckResult::ok("Chunk files", &built.join(", ")));
    }

    results
}

/// Check vector store reachability and record counts.
async fn check_store(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let db_path = settings.sqlite_path();
    if !db_path.exists() {
        results.push(CheckResult::warning(
            "Database",
            &format!("{} (not created yet)", db_path.display()),
            "Database will be created on first index run",
        ));
        return results;
    }

    match open_store(settings) {
        Ok(store) => match store.record_count().await {
            Ok(count) => {
                results.push(CheckResult::ok(
                    "Database",
                    &format!("{} ({} records)", db_path.display(), count),
                ));
                for category in Category::ALL {
                    if let Ok(count) = store.category_count(category).await {
                        results.push(CheckResult::ok(
                            category.as_str(),
                            &format!("{} records", count),
                        ));
                    }
                }
            }
            Err(e) => {
                results.push(CheckResult::error(
                    "Database",
                    &format!("unreadable: {}", e),
                    "The database file may be corrupt; re-run 'svar index --rebuild'",
                ));
            }
        },
        Err(e) => {
            results.push(CheckResult::error(
                "Database",
                &format!("cannot open: {}", e),
                "Check the [vector_store] configuration",
            ));
        }
    }

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning("Config file", "using defaults", "Create with: svar init")
    }
}

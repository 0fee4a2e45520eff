//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Svar Setup");
    println!();
    println!("Welcome to Svar! Let's make sure everything is configured correctly.\n");

    // Step 1: Check API key
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    if std::env::var("OPENAI_API_KEY").is_err() && settings.embedding.api_base.is_none() {
        Output::warning("OPENAI_API_KEY environment variable is not set.");
        println!();
        println!("  Svar requires an API key for embeddings and answer generation,");
        println!("  unless you point it at a local server via [embedding].api_base.");
        println!();
        println!("  Set it in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'svar init' again.");
            return Ok(());
        }
    } else {
        Output::success("API configuration looks good!");
    }

    println!();

    // Step 2: Create directories
    println!("{}", style("Step 2: Setting up directories").bold().cyan());
    println!();

    for (name, dir) in [
        ("data", settings.data_dir()),
        ("documents", settings.documents_dir()),
    ] {
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
            Output::success(&format!("Created {} directory: {}", name, dir.display()));
        } else {
            Output::info(&format!("{} directory exists: {}", name, dir.display()));
        }
    }

    println!();

    // Step 3: Check corpora
    println!("{}", style("Step 3: Checking corpora").bold().cyan());
    println!();

    for (name, present) in [
        ("finance markdown", settings.finance_dir().is_dir()),
        ("insurance markdown", settings.insurance_dir().is_dir()),
        ("FAQ file", settings.faq_file().is_file()),
    ] {
        if present {
            Output::success(&format!("Found {} source", name));
        } else {
            Output::warning(&format!(
                "Missing {} source; configure it under [corpus] before running 'svar build'",
                name
            ));
        }
    }

    println!();

    // Step 4: Create config file
    println!("{}", style("Step 4: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("svar doctor").cyan());
    println!("  {} Build chunk files from your corpora", style("svar build").cyan());
    println!("  {} Embed and index the chunks", style("svar index").cyan());
    println!(
        "  {} Answer a question batch",
        style("svar answer questions.json").cyan()
    );
    println!();
    println!("For more help: {}", style("svar --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}

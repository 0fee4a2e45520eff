//! Build command implementation.

use super::parse_categories;
use crate::builder;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the build command.
pub fn run_build(category: Option<&str>, settings: Settings) -> Result<()> {
    let categories = parse_categories(category)?;

    for category in categories {
        let spinner = Output::spinner(&format!("Building {} chunks...", category));

        match builder::build_and_write(&settings, category) {
            Ok(count) => {
                spinner.finish_and_clear();
                Output::success(&format!("{}: {} chunks", category, count));
            }
            Err(e) => {
                spinner.finish_and_clear();
                Output::error(&format!("Failed to build {}: {}", category, e));
                return Err(e.into());
            }
        }
    }

    Output::info(&format!(
        "Chunk files written to {}",
        settings.documents_dir().display()
    ));

    Ok(())
}

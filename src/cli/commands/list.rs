//! List command implementation.

use super::open_store;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let store = open_store(&settings)?;

    match store.list_sources().await {
        Ok(sources) => {
            if sources.is_empty() {
                Output::info("No records indexed yet. Use 'svar build' then 'svar index' to add content.");
            } else {
                Output::header(&format!("Indexed Sources ({})", sources.len()));
                println!();

                for stats in &sources {
                    Output::source_info(
                        stats.category.as_str(),
                        &stats.source,
                        stats.record_count,
                    );
                }

                let total_records: u32 = sources.iter().map(|s| s.record_count).sum();
                println!();
                Output::kv("Total sources", &sources.len().to_string());
                Output::kv("Total records", &total_records.to_string());
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to list sources: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

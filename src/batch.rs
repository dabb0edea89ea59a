//! Batch mode: scrape every identifier listed in a file
//!
//! Strictly sequential, with a fixed pause after each request.

use crate::display::{announce_fetch, render_profile, Palette};
use crate::export::{download_avatar, write_json};
use crate::fetch::Scraper;
use crate::schema::ProfileRecord;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pause between consecutive profile requests
pub const REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Outcome of a batch run
#[derive(Debug)]
pub struct BatchReport {
    pub total: usize,
    pub successful: usize,
    /// Combined JSON file, written only when something succeeded
    pub combined_file: Option<PathBuf>,
}

/// Non-empty, trimmed lines of an identifier list
pub fn parse_identifiers(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read an identifier list from disk
pub async fn read_identifiers(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(parse_identifiers(&content))
}

/// Scrape all identifiers, saving `<output>/<handle>.json` per success and a
/// combined `<output>/batch_<timestamp>.json` at the end.
pub async fn scrape_batch(
    scraper: &Scraper,
    identifiers: &[String],
    by_id: bool,
    delay: Duration,
    palette: &Palette,
) -> Result<BatchReport> {
    let output_dir = scraper.config().output_dir.clone();
    let total = identifiers.len();
    let mut all_data: Vec<ProfileRecord> = Vec::new();

    for (i, identifier) in identifiers.iter().enumerate() {
        let n = i + 1;
        println!(
            "\n{} Processing: {}",
            palette.cyan(format!("[{}/{}]", n, total)),
            palette.white(identifier)
        );

        announce_fetch(palette);
        match scraper.fetch_profile(identifier, by_id).await {
            Ok(record) => {
                print!("{}", render_profile(&record, palette));

                let fallback = format!("user_{}", n);
                let path = output_dir.join(format!("{}.json", record.file_stem_or(&fallback)));
                write_json(&path, &record)
                    .await
                    .with_context(|| format!("Failed to save {}", path.display()))?;

                all_data.push(record);
            }
            Err(e) => {
                tracing::debug!(%identifier, error = %e, "batch entry failed");
                println!("{}", palette.red(format!("❌ Failed: {}", e)));
            }
        }

        tokio::time::sleep(delay).await;
    }

    let successful = all_data.len();
    let combined_file = if all_data.is_empty() {
        None
    } else {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = output_dir.join(format!("batch_{}.json", stamp));
        write_json(&path, &all_data)
            .await
            .with_context(|| format!("Failed to save {}", path.display()))?;

        println!(
            "\n{}",
            palette.bright_green(format!(
                "✅ Successfully scraped {}/{} users",
                successful, total
            ))
        );
        println!(
            "{}",
            palette.green(format!("📁 Combined data saved to: {}", path.display()))
        );
        Some(path)
    };

    Ok(BatchReport {
        total,
        successful,
        combined_file,
    })
}

/// Download avatars for every identifier. Returns how many were saved.
pub async fn download_batch(
    scraper: &Scraper,
    identifiers: &[String],
    by_id: bool,
    delay: Duration,
    palette: &Palette,
) -> usize {
    let pics_dir = scraper.config().pics_dir.clone();
    let total = identifiers.len();
    let mut saved = 0;

    for (i, identifier) in identifiers.iter().enumerate() {
        println!(
            "\n{} Processing: {}",
            palette.cyan(format!("[{}/{}]", i + 1, total)),
            palette.white(identifier)
        );

        announce_fetch(palette);
        match scraper.fetch_profile(identifier, by_id).await {
            Ok(record) => {
                if download_avatar(scraper, &record, &pics_dir, palette)
                    .await
                    .is_some()
                {
                    saved += 1;
                }
            }
            Err(e) => println!("{}", palette.red(format!("❌ Failed: {}", e))),
        }

        tokio::time::sleep(delay).await;
    }

    println!(
        "\n{}",
        palette.bright_green(format!("✅ Downloaded {}/{} profile pictures", saved, total))
    );
    saved
}

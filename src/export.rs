//! Export sinks: JSON files and avatar downloads
//!
//! Sinks report their own failures and never propagate them.

use crate::display::Palette;
use crate::extract::NOT_AVAILABLE;
use crate::fetch::Scraper;
use crate::schema::ProfileRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Download(String),

    #[error("server answered with status {0}")]
    Rejected(u16),
}

impl ExportError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Default export file name: `<handle>_data.json`
pub fn default_json_path(record: &ProfileRecord) -> PathBuf {
    PathBuf::from(format!("{}_data.json", record.file_stem_or("tiktok_user")))
}

/// Write any serializable value as 2-space indented UTF-8 JSON
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ExportError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
        .await
        .map_err(|e| ExportError::io(path, e))
}

/// Export a profile to JSON, printing the outcome
pub async fn export_json(
    record: &ProfileRecord,
    path: Option<&Path>,
    palette: &Palette,
) -> bool {
    let path = path.map(Path::to_path_buf).unwrap_or_else(|| default_json_path(record));

    match write_json(&path, record).await {
        Ok(()) => {
            println!(
                "\n{} {}",
                palette.bright_green("💾 Data exported to:"),
                palette.white(path.display())
            );
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "JSON export failed");
            println!("{} {}", palette.red("❌ Export failed:"), e);
            false
        }
    }
}

/// Avatar URL with escaped slashes restored, if one was captured
pub fn avatar_url(record: &ProfileRecord) -> Option<String> {
    let url = record.avatar_larger.as_str();
    if url.is_empty() || url == NOT_AVAILABLE {
        return None;
    }
    Some(url.replace("\\u002F", "/"))
}

/// Where an avatar for this profile is saved
pub fn avatar_path(record: &ProfileRecord, dir: &Path) -> PathBuf {
    dir.join(format!("{}_profile.jpg", record.file_stem_or("user")))
}

async fn stream_avatar(scraper: &Scraper, url: &str, path: &Path) -> Result<(), ExportError> {
    let mut response = scraper
        .client()
        .get(url)
        .timeout(scraper.config().avatar_timeout)
        .send()
        .await
        .map_err(|e| ExportError::Download(e.to_string()))?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(ExportError::Rejected(response.status().as_u16()));
    }

    let mut file = fs::File::create(path)
        .await
        .map_err(|e| ExportError::io(path, e))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ExportError::Download(e.to_string()))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| ExportError::io(path, e))?;
    }
    file.flush().await.map_err(|e| ExportError::io(path, e))?;

    Ok(())
}

/// Download the profile picture into `dir`. Failures are printed, not raised.
pub async fn download_avatar(
    scraper: &Scraper,
    record: &ProfileRecord,
    dir: &Path,
    palette: &Palette,
) -> Option<PathBuf> {
    let url = avatar_url(record)?;

    if let Err(e) = fs::create_dir_all(dir).await {
        println!("{} {}", palette.red("❌ Error downloading:"), e);
        return None;
    }

    println!("\n{}", palette.cyan("📥 Downloading profile picture..."));
    let path = avatar_path(record, dir);

    match stream_avatar(scraper, &url, &path).await {
        Ok(()) => {
            println!(
                "{} {}",
                palette.bright_green("✅ Downloaded:"),
                palette.white(path.display())
            );
            Some(path)
        }
        Err(ExportError::Rejected(status)) => {
            tracing::warn!(%url, status, "avatar download rejected");
            println!("{}", palette.red("❌ Failed to download"));
            None
        }
        Err(e) => {
            tracing::warn!(%url, error = %e, "avatar download failed");
            println!("{} {}", palette.red("❌ Error downloading:"), e);
            None
        }
    }
}

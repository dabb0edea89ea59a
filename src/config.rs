//! Scraper configuration
//!
//! Defaults mirror the values the scraper has always shipped with; the CLI
//! overrides them from flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.tiktok.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const AVATAR_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PICS_DIR: &str = "profile_pics";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_EXPORT_DIR: &str = ".";

/// Log filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "tikscrape=warn";

/// Runtime configuration shared by fetch, export and the shell
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Site root, without trailing slash
    pub base_url: String,
    pub user_agent: String,
    /// Timeout for profile page requests
    pub timeout: Duration,
    /// Timeout for avatar downloads
    pub avatar_timeout: Duration,
    /// Where avatars are saved
    pub pics_dir: PathBuf,
    /// Where batch JSON files are saved
    pub output_dir: PathBuf,
    /// Where single-user `<handle>_data.json` exports are saved
    pub export_dir: PathBuf,
    pub use_colors: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            avatar_timeout: Duration::from_secs(AVATAR_TIMEOUT_SECS),
            pics_dir: PathBuf::from(DEFAULT_PICS_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            use_colors: true,
        }
    }
}

impl ScraperConfig {
    /// Point the scraper at a different site root (trailing slashes dropped)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Profile page URL for a cleaned identifier
    pub fn profile_url(&self, identifier: &str, by_id: bool) -> String {
        if by_id {
            format!("{}/@user{}", self.base_url, identifier)
        } else {
            format!("{}/@{}", self.base_url, identifier)
        }
    }
}

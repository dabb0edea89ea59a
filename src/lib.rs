//! tikscrape: TikTok public profile scraper
//!
//! Pipeline:
//! - extract: pattern matching on the raw profile page
//! - normalize: typed, human-readable field values
//! - links: social handles, bio links and email from the biography
//! - fetch: one GET per profile, errors returned in-band
//! - display / export: terminal view, JSON files, avatar downloads

pub mod batch;
pub mod config;
pub mod display;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod links;
pub mod normalize;
pub mod schema;
pub mod shell;

pub use config::ScraperConfig;
pub use fetch::{parse_profile, Scraper};
pub use schema::{outcome_to_json, ErrorRecord, FetchError, ProfileRecord};

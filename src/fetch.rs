//! Profile fetching: one GET, then extract, normalize and link discovery
//!
//! Failures never escape as panics; they come back as a `FetchError` whose
//! message is the in-band error record.

use crate::config::ScraperConfig;
use crate::extract::extract_fields;
use crate::links::extract_social_links;
use crate::normalize::normalize;
use crate::schema::{FetchError, ProfileRecord};
use chrono::Local;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Instant;

/// Browser-like headers sent with every profile request
const BROWSER_HEADERS: [(&str, &str); 10] = [
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.9"),
    ("dnt", "1"),
    ("connection", "keep-alive"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("cache-control", "max-age=0"),
];

fn browser_headers() -> HeaderMap {
    BROWSER_HEADERS
        .iter()
        .map(|&(name, value)| {
            (
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            )
        })
        .collect()
}

/// Drop a leading `@` from handles; ids are used as given
pub fn clean_identifier(identifier: &str, by_id: bool) -> &str {
    let identifier = identifier.trim();
    if by_id {
        identifier
    } else {
        identifier.strip_prefix('@').unwrap_or(identifier)
    }
}

/// Profile scraper holding the HTTP client and configuration
pub struct Scraper {
    client: Client,
    config: ScraperConfig,
}

impl Scraper {
    pub fn new(config: ScraperConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(browser_headers())
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Unexpected(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ScraperConfig {
        &mut self.config
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Fetch and parse one profile by handle or numeric id
    pub async fn fetch_profile(
        &self,
        identifier: &str,
        by_id: bool,
    ) -> Result<ProfileRecord, FetchError> {
        let start = Instant::now();
        let identifier = clean_identifier(identifier, by_id);
        let url = self.config.profile_url(identifier, by_id);

        tracing::debug!(%url, by_id, "fetching profile");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "profile response");
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                FetchError::Network(e.to_string())
            } else {
                FetchError::Unexpected(e.to_string())
            }
        })?;

        let mut record = parse_profile(&body);
        record.fetch_time = format!("{:.2}s", start.elapsed().as_secs_f64());
        record.timestamp = Local::now().to_rfc3339();
        record.url = url;

        Ok(record)
    }
}

/// Extract, normalize and attach social links for a page body
pub fn parse_profile(page: &str) -> ProfileRecord {
    let raw = extract_fields(page);
    let mut record = normalize(&raw);
    record.social_links = extract_social_links(page, &record.signature);
    record
}

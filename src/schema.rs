//! Profile record schema
//!
//! The exported JSON keeps the key names the scraper has always written.

use crate::extract::NOT_AVAILABLE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A fully keyed profile. Missing data is `N/A`, never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: String,
    pub unique_id: String,
    pub nickname: String,
    /// Magnitude formatted (e.g. `1.2M`)
    pub followers: String,
    pub following: String,
    pub likes: String,
    pub videos: String,
    /// Biography, with `\n` and `\"` unescaped
    pub signature: String,
    pub verified: bool,
    #[serde(rename = "secUid")]
    pub sec_uid: String,
    #[serde(rename = "privateAccount")]
    pub private_account: bool,
    pub region: String,
    #[serde(rename = "diggCount")]
    pub digg_count: String,
    #[serde(rename = "friendCount")]
    pub friend_count: String,
    #[serde(rename = "avatarLarger")]
    pub avatar_larger: String,
    /// `YYYY-MM-DD HH:MM:SS` when the raw epoch parsed, raw value otherwise
    #[serde(rename = "createTime")]
    pub create_time: String,
    pub social_links: Vec<String>,
    /// Elapsed request time, e.g. `0.42s`
    pub fetch_time: String,
    /// RFC 3339 capture time
    pub timestamp: String,
    pub url: String,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            user_id: na(),
            unique_id: na(),
            nickname: na(),
            followers: na(),
            following: na(),
            likes: na(),
            videos: na(),
            signature: na(),
            verified: false,
            sec_uid: na(),
            private_account: false,
            region: na(),
            digg_count: na(),
            friend_count: na(),
            avatar_larger: na(),
            create_time: na(),
            social_links: Vec::new(),
            fetch_time: na(),
            timestamp: na(),
            url: na(),
        }
    }
}

impl ProfileRecord {
    /// Handle used for file names, falling back when the handle is unknown
    pub fn file_stem_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.unique_id.is_empty() || self.unique_id == NOT_AVAILABLE {
            fallback
        } else {
            &self.unique_id
        }
    }
}

/// Why a profile fetch failed. `Display` is the in-band error message.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch user (Status: {0})")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// In-band error record written in place of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
}

impl From<&FetchError> for ErrorRecord {
    fn from(err: &FetchError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Serialize a fetch outcome: the profile, or `{"error": ...}`
pub fn outcome_to_json(outcome: &Result<ProfileRecord, FetchError>) -> serde_json::Result<String> {
    match outcome {
        Ok(record) => serde_json::to_string_pretty(record),
        Err(err) => serde_json::to_string_pretty(&ErrorRecord::from(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        assert_eq!(
            FetchError::Status(404).to_string(),
            "Failed to fetch user (Status: 404)"
        );
    }

    #[test]
    fn test_error_record_json() {
        let json = outcome_to_json(&Err(FetchError::Status(404))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"error": "Failed to fetch user (Status: 404)"})
        );
    }

    #[test]
    fn test_record_is_fully_keyed() {
        let value = serde_json::to_value(ProfileRecord::default()).unwrap();
        let keys = [
            "user_id",
            "unique_id",
            "nickname",
            "followers",
            "following",
            "likes",
            "videos",
            "signature",
            "verified",
            "secUid",
            "privateAccount",
            "region",
            "diggCount",
            "friendCount",
            "avatarLarger",
            "createTime",
            "social_links",
            "fetch_time",
            "timestamp",
            "url",
        ];
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), keys.len());
        for key in keys {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn test_file_stem_fallback() {
        let mut record = ProfileRecord::default();
        assert_eq!(record.file_stem_or("user_3"), "user_3");
        record.unique_id = "jane".to_string();
        assert_eq!(record.file_stem_or("user_3"), "jane");
    }
}

//! Profile field extraction from raw page text
//!
//! Each field has a primary pattern and, for a few fields, an alternate.
//! The first match in document order wins; unmatched fields get `N/A`.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Marker for a field whose pattern did not match
pub const NOT_AVAILABLE: &str = "N/A";

/// The sixteen fields captured from a profile page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    UserId,
    UniqueId,
    Nickname,
    Followers,
    Following,
    Likes,
    Videos,
    Signature,
    Verified,
    SecUid,
    PrivateAccount,
    Region,
    DiggCount,
    FriendCount,
    AvatarLarger,
    CreateTime,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::UserId,
        Field::UniqueId,
        Field::Nickname,
        Field::Followers,
        Field::Following,
        Field::Likes,
        Field::Videos,
        Field::Signature,
        Field::Verified,
        Field::SecUid,
        Field::PrivateAccount,
        Field::Region,
        Field::DiggCount,
        Field::FriendCount,
        Field::AvatarLarger,
        Field::CreateTime,
    ];

    /// Key used in exported JSON
    pub fn key(self) -> &'static str {
        match self {
            Field::UserId => "user_id",
            Field::UniqueId => "unique_id",
            Field::Nickname => "nickname",
            Field::Followers => "followers",
            Field::Following => "following",
            Field::Likes => "likes",
            Field::Videos => "videos",
            Field::Signature => "signature",
            Field::Verified => "verified",
            Field::SecUid => "secUid",
            Field::PrivateAccount => "privateAccount",
            Field::Region => "region",
            Field::DiggCount => "diggCount",
            Field::FriendCount => "friendCount",
            Field::AvatarLarger => "avatarLarger",
            Field::CreateTime => "createTime",
        }
    }

    fn primary(self) -> &'static str {
        match self {
            Field::UserId => r#""webapp\.user-detail"[^}]*"id":"(\d+)""#,
            Field::UniqueId => r#""uniqueId":"([^"]+)""#,
            Field::Nickname => r#""nickname":"([^"]+)""#,
            Field::Followers => r#""followerCount":(\d+)"#,
            Field::Following => r#""followingCount":(\d+)"#,
            Field::Likes => r#""heartCount":(\d+)"#,
            Field::Videos => r#""videoCount":(\d+)"#,
            Field::Signature => r#""signature":"([^"]*?)""#,
            Field::Verified => r#""verified":(true|false)"#,
            Field::SecUid => r#""secUid":"([^"]+)""#,
            Field::PrivateAccount => r#""privateAccount":(true|false)"#,
            Field::Region => r#""region":"([^"]*)""#,
            Field::DiggCount => r#""diggCount":(\d+)"#,
            Field::FriendCount => r#""friendCount":(\d+)"#,
            Field::AvatarLarger => r#""avatarLarger":"([^"]+)""#,
            Field::CreateTime => r#""createTime":(\d+)"#,
        }
    }

    // Only three fields have a second chance.
    fn alternate(self) -> Option<&'static str> {
        match self {
            Field::UserId => Some(r#""userId":"(\d+)""#),
            Field::UniqueId => Some(r#""uniqueId":"([^"]+)""#),
            Field::Nickname => Some(r#""nickName":"([^"]+)""#),
            _ => None,
        }
    }
}

struct FieldPatterns {
    field: Field,
    primary: Regex,
    alternate: Option<Regex>,
}

static PATTERNS: LazyLock<Vec<FieldPatterns>> = LazyLock::new(|| {
    Field::ALL
        .iter()
        .filter_map(|&field| {
            let primary = Regex::new(field.primary()).ok()?;
            let alternate = field.alternate().and_then(|p| Regex::new(p).ok());
            Some(FieldPatterns {
                field,
                primary,
                alternate,
            })
        })
        .collect()
});

/// Field values as captured from the page, before normalization
#[derive(Debug, Clone, Default)]
pub struct RawProfile {
    values: HashMap<Field, String>,
}

impl RawProfile {
    /// Captured value, or `N/A` when the field never matched
    pub fn get(&self, field: Field) -> &str {
        self.values
            .get(&field)
            .map(String::as_str)
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract all profile fields from page text. Never fails.
pub fn extract_fields(page: &str) -> RawProfile {
    let mut raw = RawProfile::default();

    for patterns in PATTERNS.iter() {
        let value = first_capture(&patterns.primary, page)
            .or_else(|| {
                patterns
                    .alternate
                    .as_ref()
                    .and_then(|alt| first_capture(alt, page))
            })
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        raw.set(patterns.field, value);
    }

    tracing::debug!(
        matched = Field::ALL
            .iter()
            .filter(|&&f| raw.get(f) != NOT_AVAILABLE)
            .count(),
        "extracted profile fields"
    );

    raw
}

//! Coercion of raw captures into display-ready values

use crate::extract::{Field, RawProfile};
use crate::schema::ProfileRecord;
use chrono::DateTime;

/// Format a count with a B/M/K suffix. Non-numeric input is returned as-is.
///
/// Parsed as `i128` so counts beyond `i64` still get a suffix.
pub fn format_magnitude(raw: &str) -> String {
    let Ok(num) = raw.parse::<i128>() else {
        return raw.to_string();
    };

    if num >= 1_000_000_000 {
        format!("{:.1}B", num as f64 / 1_000_000_000.0)
    } else if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// `true` only for a case-insensitive "true"
pub fn parse_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

/// Undo the two escapes that survive in the embedded JSON biography
pub fn unescape_signature(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\\"", "\"")
}

/// Render a positive epoch-seconds value as `YYYY-MM-DD HH:MM:SS` (UTC)
pub fn format_create_time(raw: &str) -> String {
    raw.parse::<i64>()
        .ok()
        .filter(|&secs| secs > 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Build a typed record from raw captures.
///
/// Social links and request metadata are left at their defaults; the
/// fetch orchestrator fills them in afterwards.
pub fn normalize(raw: &RawProfile) -> ProfileRecord {
    let text = |field| raw.get(field).to_string();

    ProfileRecord {
        user_id: text(Field::UserId),
        unique_id: text(Field::UniqueId),
        nickname: text(Field::Nickname),
        followers: format_magnitude(raw.get(Field::Followers)),
        following: format_magnitude(raw.get(Field::Following)),
        likes: format_magnitude(raw.get(Field::Likes)),
        videos: format_magnitude(raw.get(Field::Videos)),
        signature: unescape_signature(raw.get(Field::Signature)),
        verified: parse_flag(raw.get(Field::Verified)),
        sec_uid: text(Field::SecUid),
        private_account: parse_flag(raw.get(Field::PrivateAccount)),
        region: text(Field::Region),
        digg_count: text(Field::DiggCount),
        friend_count: text(Field::FriendCount),
        avatar_larger: text(Field::AvatarLarger),
        create_time: format_create_time(raw.get(Field::CreateTime)),
        ..ProfileRecord::default()
    }
}

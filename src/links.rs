//! Social link discovery in the page and the biography
//!
//! Best-effort: handles are pulled out of free text with loose patterns,
//! so false positives are expected and kept.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Maximum number of links kept per profile
pub const MAX_LINKS: usize = 10;

const BIO_LINK_PATTERNS: [&str; 4] = [
    r#"href="https://www\.tiktok\.com/link/v2\?[^"]*?target=([^"&]+)""#,
    r#"scene=bio_url[^"]*?target=([^"&]+)"#,
    r#""bioLink":\{"link":"([^"]+)""#,
    r#""shareUrl":"([^"]+)""#,
];

const PLATFORM_PATTERNS: [(&str, &[&str]); 6] = [
    (
        "instagram",
        &[
            r"[iI][gG][\s:]*@?([a-zA-Z0-9._]+)",
            r"instagram\.com/([a-zA-Z0-9._]+)",
        ],
    ),
    (
        "twitter",
        &[
            r"[tT]witter[\s:]*@?([a-zA-Z0-9._]+)",
            r"twitter\.com/([a-zA-Z0-9._]+)",
            r"x\.com/([a-zA-Z0-9._]+)",
        ],
    ),
    (
        "youtube",
        &[
            r"[yY][tT][\s:]*@?([a-zA-Z0-9._]+)",
            r"youtube\.com/([a-zA-Z0-9._]+)",
        ],
    ),
    (
        "snapchat",
        &[
            r"[sS]napchat[\s:]*@?([a-zA-Z0-9._]+)",
            r"snapchat\.com/add/([a-zA-Z0-9._]+)",
        ],
    ),
    (
        "facebook",
        &[
            r"[fF][bB][\s:]*@?([a-zA-Z0-9._]+)",
            r"facebook\.com/([a-zA-Z0-9._]+)",
        ],
    ),
    (
        "telegram",
        &[
            r"[tT]elegram[\s:]*@?([a-zA-Z0-9._]+)",
            r"t\.me/([a-zA-Z0-9._]+)",
        ],
    ),
];

const EMAIL_PATTERN: &str = r"[\w\.-]+@[\w\.-]+\.\w+";

static BIO_LINKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BIO_LINK_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

static PLATFORMS: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    PLATFORM_PATTERNS
        .iter()
        .map(|(platform, patterns)| {
            let compiled = patterns.iter().filter_map(|p| Regex::new(p).ok()).collect();
            (*platform, compiled)
        })
        .collect()
});

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

/// URLs wrapped by the site's bio link redirector, percent-decoded
pub fn extract_bio_links(page: &str) -> Vec<String> {
    let mut links = Vec::new();

    for re in BIO_LINKS.iter() {
        for cap in re.captures_iter(page) {
            let Some(target) = cap.get(1) else { continue };
            let decoded = String::from_utf8_lossy(&urlencoding::decode_binary(
                target.as_str().as_bytes(),
            ))
            .into_owned();

            if ["http://", "https://", "www."]
                .iter()
                .any(|prefix| decoded.starts_with(prefix))
                && !links.contains(&decoded)
            {
                links.push(decoded);
            }
        }
    }

    links
}

/// One `platform:handle` per platform mentioned in the biography
pub fn extract_platform_handles(bio: &str) -> Vec<String> {
    PLATFORMS
        .iter()
        .filter_map(|(platform, patterns)| {
            patterns
                .iter()
                .find_map(|re| re.captures(bio).and_then(|cap| cap.get(1)))
                .map(|handle| format!("{}:{}", platform, handle.as_str()))
        })
        .collect()
}

/// First email address in the biography, tagged `email:`
pub fn extract_email(bio: &str) -> Option<String> {
    EMAIL
        .as_ref()?
        .find(bio)
        .map(|m| format!("email:{}", m.as_str()))
}

/// All social links for a profile: deduplicated, first-seen order, capped
pub fn extract_social_links(page: &str, bio: &str) -> Vec<String> {
    let candidates = extract_bio_links(page)
        .into_iter()
        .chain(extract_platform_handles(bio))
        .chain(extract_email(bio));

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for link in candidates {
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links.truncate(MAX_LINKS);
    links
}

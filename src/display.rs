//! Terminal rendering of profiles and errors
//!
//! Color is carried by an explicit `Palette`, so the same renderer serves
//! colored, `--no-color` and test output.

use crate::extract::NOT_AVAILABLE;
use crate::schema::{FetchError, ProfileRecord};
use console::Style;

/// Color switch threaded through all rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Apply a style when colors are on; plain text otherwise
    pub fn paint(&self, text: impl std::fmt::Display, style: &Style) -> String {
        if self.enabled {
            style.apply_to(text).force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn red(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().red())
    }

    pub fn bright_red(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().red().bright())
    }

    pub fn green(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().green())
    }

    pub fn bright_green(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().green().bright())
    }

    pub fn yellow(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().yellow())
    }

    pub fn bright_yellow(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().yellow().bright())
    }

    pub fn blue(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().blue())
    }

    pub fn cyan(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().cyan())
    }

    pub fn bright_cyan(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().cyan().bright())
    }

    pub fn bright_magenta(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().magenta().bright())
    }

    pub fn white(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().white())
    }

    pub fn bright_white(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().white().bright())
    }

    pub fn bold(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().bold())
    }

    pub fn dim(&self, text: impl std::fmt::Display) -> String {
        self.paint(text, &Style::new().dim())
    }
}

/// Single red line for a failed fetch
pub fn render_error(err: &FetchError, palette: &Palette) -> String {
    format!(
        "\n{}: {}\n",
        palette.bright_red("❌ ERROR"),
        palette.red(err)
    )
}

fn section(title: &str, palette: &Palette) -> [String; 2] {
    [
        format!("\n{}", palette.bright_yellow(title)),
        palette.cyan("─".repeat(40)),
    ]
}

fn line(label: &str, value: String, palette: &Palette) -> String {
    format!("{} {}", palette.green(label), value)
}

fn stat(label: &str, value: &str, palette: &Palette) -> String {
    format!("{} {}", palette.blue(label), palette.bright_white(value))
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Full sectioned profile view
pub fn render_profile(record: &ProfileRecord, palette: &Palette) -> String {
    let rule = "=".repeat(60);
    let mut lines = vec![
        format!("\n{}", palette.bright_cyan(&rule)),
        palette.bright_magenta("👤 TIKTOK USER PROFILE"),
        palette.bright_cyan(&rule),
    ];

    let verified = if record.verified {
        palette.bright_yellow("✅")
    } else {
        palette.red("❌")
    };
    let private = if record.private_account {
        palette.bright_yellow("🔒")
    } else {
        palette.green("🔓")
    };

    lines.extend(section("📋 BASIC INFORMATION", palette));
    lines.push(line(
        "Username:",
        palette.bright_white(format!("@{}", record.unique_id)),
        palette,
    ));
    lines.push(line("Nickname:", palette.white(&record.nickname), palette));
    lines.push(line("User ID:", palette.white(&record.user_id), palette));
    lines.push(line("Verified:", verified, palette));
    lines.push(line("Private:", private, palette));

    lines.extend(section("📊 STATISTICS", palette));
    lines.extend([
        stat("👥 Followers:", &record.followers, palette),
        stat("🤝 Following:", &record.following, palette),
        stat("❤️  Total Likes:", &record.likes, palette),
        stat("🎬 Videos:", &record.videos, palette),
        stat("👍 Digg Count:", &record.digg_count, palette),
        stat("👯 Friends:", &record.friend_count, palette),
    ]);

    if !record.signature.is_empty() && record.signature != NOT_AVAILABLE {
        lines.extend(section("📝 BIOGRAPHY", palette));
        lines.push(palette.white(&record.signature));
    }

    if !record.social_links.is_empty() {
        lines.extend(section("🔗 SOCIAL LINKS", palette));
        lines.extend(record.social_links.iter().enumerate().map(|(i, link)| {
            format!(
                "{} {}",
                palette.green(format!("{}.", i + 1)),
                palette.cyan(link)
            )
        }));
    }

    lines.extend(section("🔧 ADDITIONAL INFO", palette));
    lines.push(line(
        "SecUid:",
        palette.dim(format!("{}...", truncate_chars(&record.sec_uid, 30))),
        palette,
    ));
    lines.push(line("Region:", palette.white(&record.region), palette));
    if !record.create_time.is_empty() && record.create_time != NOT_AVAILABLE {
        lines.push(line("Created:", palette.white(&record.create_time), palette));
    }

    if record.fetch_time != NOT_AVAILABLE {
        lines.push(format!(
            "\n{} {}",
            palette.dim("⏱️  Fetch Time:"),
            palette.dim(&record.fetch_time)
        ));
    }

    lines.push(format!("\n{}", palette.bright_cyan(&rule)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render either outcome of a fetch
pub fn render_outcome(outcome: &Result<ProfileRecord, FetchError>, palette: &Palette) -> String {
    match outcome {
        Ok(record) => render_profile(record, palette),
        Err(err) => render_error(err, palette),
    }
}

/// Progress line shown before a request goes out
pub fn announce_fetch(palette: &Palette) {
    eprintln!(
        "\n{} {}",
        palette.bright_cyan("🌐"),
        palette.cyan("Fetching data from TikTok...")
    );
}

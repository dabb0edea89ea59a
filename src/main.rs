//! tikscrape CLI
//!
//! With an identifier: fetch one profile and print it (terminal view or
//! JSON). Without one: interactive menu.

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tikscrape::config::{
    DEFAULT_BASE_URL, DEFAULT_EXPORT_DIR, DEFAULT_LOG_FILTER, DEFAULT_OUTPUT_DIR, DEFAULT_PICS_DIR,
};
use tikscrape::display::{announce_fetch, render_outcome, Palette};
use tikscrape::export::download_avatar;
use tikscrape::shell::Shell;
use tikscrape::{outcome_to_json, Scraper, ScraperConfig};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tikscrape")]
#[command(author = "RoyalBit Inc.")]
#[command(version)]
#[command(about = "TikTok user information scraper")]
#[command(after_help = "Examples:\n  tikscrape @username\n  tikscrape username\n  tikscrape --by-id 123456789\n  tikscrape @username --download\n  tikscrape @username --json\n\nRun without arguments for the interactive menu.")]
struct Cli {
    /// TikTok username (with or without @) or user ID
    identifier: Option<String>,

    /// Treat the identifier as a numeric user ID
    #[arg(long)]
    by_id: bool,

    /// Download the profile picture
    #[arg(long)]
    download: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Site root to fetch profiles from
    #[arg(long, env = "TIKSCRAPE_BASE_URL", default_value = DEFAULT_BASE_URL, hide = true)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "TIKSCRAPE_TIMEOUT", default_value = "15", hide = true)]
    timeout: u64,

    /// Directory for downloaded profile pictures
    #[arg(long, env = "TIKSCRAPE_PICS_DIR", default_value = DEFAULT_PICS_DIR, hide = true)]
    pics_dir: PathBuf,

    /// Directory for batch JSON output
    #[arg(long, env = "TIKSCRAPE_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR, hide = true)]
    output_dir: PathBuf,

    /// Directory for single-user JSON exports
    #[arg(long, env = "TIKSCRAPE_EXPORT_DIR", default_value = DEFAULT_EXPORT_DIR, hide = true)]
    export_dir: PathBuf,
}

impl Cli {
    fn config(&self) -> ScraperConfig {
        ScraperConfig {
            timeout: Duration::from_secs(self.timeout),
            pics_dir: self.pics_dir.clone(),
            output_dir: self.output_dir.clone(),
            export_dir: self.export_dir.clone(),
            use_colors: !self.no_color,
            ..ScraperConfig::default()
        }
        .with_base_url(self.base_url.as_str())
    }
}

/// Single-shot mode. Fetch errors are reported in-band; exit is always 0.
async fn run_once(scraper: &Scraper, cli: &Cli, identifier: &str) -> Result<()> {
    let palette = Palette::new(scraper.config().use_colors);

    if !cli.json {
        announce_fetch(&palette);
    }
    let outcome = scraper.fetch_profile(identifier, cli.by_id).await;

    if cli.json {
        println!("{}", outcome_to_json(&outcome)?);
    } else {
        print!("{}", render_outcome(&outcome, &palette));
    }

    if let (true, Ok(record)) = (cli.download, &outcome) {
        download_avatar(scraper, record, &scraper.config().pics_dir, &palette).await;
    }

    Ok(())
}

/// Menu mode. Ctrl-C exits cleanly; other faults are fatal.
///
/// Returns the process exit code. The caller must exit the process directly:
/// a pending stdin read would otherwise keep the runtime from shutting down.
async fn run_menu(scraper: Scraper) -> i32 {
    let palette = Palette::new(scraper.config().use_colors);
    let mut shell = Shell::new(scraper, BufReader::new(tokio::io::stdin()));

    tokio::select! {
        result = shell.run() => match result {
            Ok(()) => 0,
            Err(e) => {
                println!("\n{} {:#}", palette.bright_red("❌ Fatal error:"), e);
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\n\n{}", palette.bright_red("⚠️  Interrupted by user"));
            0
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let scraper = Scraper::new(cli.config())?;

    match cli.identifier.as_deref() {
        Some(identifier) => {
            run_once(&scraper, &cli, identifier).await?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let code = run_menu(scraper).await;
            let _ = std::io::stdout().flush();
            std::process::exit(code);
        }
    }
}

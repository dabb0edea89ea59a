//! Interactive menu mode
//!
//! Reads choices line by line from any async reader so the menu can be
//! driven from a terminal or from a script.

use crate::batch::{download_batch, read_identifiers, scrape_batch, REQUEST_DELAY};
use crate::display::{announce_fetch, render_outcome, Palette};
use crate::export::{default_json_path, download_avatar, export_json};
use crate::schema::ProfileRecord;
use crate::fetch::Scraper;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const MENU_RULE_WIDTH: usize = 40;

/// Menu loop state: the scraper (with its settings) and the input source
pub struct Shell<R> {
    scraper: Scraper,
    input: R,
    clear_screen: bool,
    delay: Duration,
}

impl<R: AsyncBufRead + Unpin> Shell<R> {
    pub fn new(scraper: Scraper, input: R) -> Self {
        Self {
            scraper,
            input,
            clear_screen: true,
            delay: REQUEST_DELAY,
        }
    }

    /// Keep previous output on screen (scripted runs, tests)
    pub fn without_clear(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    /// Override the pause between batch requests and after invalid choices
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn scraper(&self) -> &Scraper {
        &self.scraper
    }

    /// `<handle>_data.json` under the configured export directory
    fn export_path(&self, record: &ProfileRecord) -> PathBuf {
        self.scraper.config().export_dir.join(default_json_path(record))
    }

    fn palette(&self) -> Palette {
        Palette::new(self.scraper.config().use_colors)
    }

    /// Prompt and read one trimmed line. `None` once input is exhausted.
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        print!("{}", text);
        std::io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like `prompt`, but an exhausted input reads as an empty answer
    async fn ask(&mut self, text: &str) -> Result<String> {
        Ok(self.prompt(text).await?.unwrap_or_default())
    }

    async fn pause(&mut self) -> Result<()> {
        let text = format!("\n{}", self.palette().dim("Press Enter to continue..."));
        self.prompt(&text).await?;
        Ok(())
    }

    fn header(&self) {
        if self.clear_screen {
            let _ = console::Term::stdout().clear_screen();
        }
        let p = self.palette();
        let rule = "=".repeat(60);
        println!("{}", p.bright_cyan(&rule));
        println!("{}", p.bright_magenta(p.bold("TIKTOK USER INFO SCRAPER")));
        println!("{}", p.bright_cyan(&rule));
        println!(
            "{}\n",
            p.dim(format!(
                "Version {} | Terminal Menu | No API Required",
                env!("CARGO_PKG_VERSION")
            ))
        );
    }

    fn banner(&self) {
        let p = self.palette();
        let frame = format!("+{}+", "-".repeat(46));
        println!("{}", p.bright_magenta(&frame));
        println!(
            "{}{}{}",
            p.bright_magenta("|"),
            p.bright_cyan(format!("{:^46}", "tikscrape")),
            p.bright_magenta("|")
        );
        println!(
            "{}{}{}",
            p.bright_magenta("|"),
            p.bright_green(format!("{:^46}", "public profile lookup")),
            p.bright_magenta("|")
        );
        println!("{}", p.bright_magenta(&frame));
    }

    fn menu(&self) {
        let p = self.palette();
        let rule = p.cyan("─".repeat(MENU_RULE_WIDTH));
        println!("{}", p.bright_yellow(p.bold("MAIN MENU")));
        println!("{}", rule);
        for (key, label) in [
            ("1", "Scrape by Username"),
            ("2", "Scrape by User ID"),
            ("3", "Scrape Multiple Users (from file)"),
            ("4", "Batch Download Profile Pictures"),
            ("5", "Export Data to JSON"),
            ("6", "Settings (Colors)"),
        ] {
            println!("{} {}", p.green(format!("[{}]", key)), p.bold(label));
        }
        println!("{} {}", p.red("[0]"), p.bold("Exit"));
        println!("{}", rule);
    }

    /// Run the menu until the user exits or input ends
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.header();
            self.banner();
            self.menu();

            let text = format!("\n{}", self.palette().yellow("Select option [0-6]: "));
            let Some(choice) = self.prompt(&text).await? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.scrape_single().await?,
                "2" => self.scrape_by_id().await?,
                "3" => self.scrape_multiple().await?,
                "4" => self.download_pictures().await?,
                "5" => self.export_user().await?,
                "6" => self.settings().await?,
                "0" => {
                    println!(
                        "\n{}\n",
                        self.palette().bright_green("👋 Thank you for using tikscrape!")
                    );
                    return Ok(());
                }
                _ => {
                    println!(
                        "\n{}",
                        self.palette().red("❌ Invalid choice! Please try again.")
                    );
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }

    /// Ask for an identifier; prints an error and pauses when empty
    async fn ask_identifier(&mut self, label: &str) -> Result<Option<String>> {
        let text = format!("\n{}", self.palette().yellow(format!("Enter {}: ", label)));
        let identifier = self.ask(&text).await?;
        if identifier.is_empty() {
            println!("{}", self.palette().red("❌ No input provided!"));
            self.pause().await?;
            return Ok(None);
        }
        Ok(Some(identifier))
    }

    async fn scrape_single(&mut self) -> Result<()> {
        self.header();
        let p = self.palette();
        println!("{}\n", p.bright_yellow("SCRAPE SINGLE USER"));
        println!("{}", p.cyan("Choose method:"));
        println!("  {} - By Username (e.g., @username)", p.green("1"));
        println!("  {} - By User ID", p.green("2"));
        println!("  {} - Back to Main Menu\n", p.green("0"));

        let choice = self.ask(&p.yellow("Choice [1/2/0]: ")).await?;
        if choice == "0" {
            return Ok(());
        }

        let by_id = choice == "2";
        let label = if by_id { "User ID" } else { "Username" };
        let Some(identifier) = self.ask_identifier(label).await? else {
            return Ok(());
        };

        announce_fetch(&p);
        let outcome = self.scraper.fetch_profile(&identifier, by_id).await;
        print!("{}", render_outcome(&outcome, &p));

        if let Ok(record) = &outcome {
            println!("\n{}", p.yellow("Available Actions:"));
            println!("  {} - Download Profile Picture", p.green("1"));
            println!("  {} - Export to JSON", p.green("2"));
            println!("  {} - Continue", p.green("0"));

            let action = self.ask(&format!("\n{}", p.yellow("Action [0-2]: "))).await?;
            match action.as_str() {
                "1" => {
                    let dir = self.scraper.config().pics_dir.clone();
                    download_avatar(&self.scraper, record, &dir, &p).await;
                }
                "2" => {
                    export_json(record, Some(&self.export_path(record)), &p).await;
                }
                _ => {}
            }
        }

        self.pause().await
    }

    async fn scrape_by_id(&mut self) -> Result<()> {
        self.header();
        let p = self.palette();
        let identifier = self
            .ask(&format!("\n{}", p.yellow("Enter User ID: ")))
            .await?;
        if identifier.is_empty() {
            return Ok(());
        }

        announce_fetch(&p);
        let outcome = self.scraper.fetch_profile(&identifier, true).await;
        print!("{}", render_outcome(&outcome, &p));
        if let Ok(record) = &outcome {
            let dir = self.scraper.config().pics_dir.clone();
            download_avatar(&self.scraper, record, &dir, &p).await;
        }

        self.pause().await
    }

    /// Ask for an identifier file and load it; `None` when unusable
    async fn ask_identifier_file(&mut self) -> Result<Option<(Vec<String>, bool)>> {
        let p = self.palette();
        let filename = self
            .ask(&p.yellow("Enter filename with usernames/IDs (one per line): "))
            .await?;
        let path = PathBuf::from(&filename);

        if filename.is_empty() || !path.exists() {
            println!("{}", p.red("❌ File not found!"));
            self.pause().await?;
            return Ok(None);
        }

        let identifiers = match read_identifiers(&path).await {
            Ok(ids) => ids,
            Err(e) => {
                println!("{}", p.red(format!("❌ Error: {:#}", e)));
                self.pause().await?;
                return Ok(None);
            }
        };
        println!(
            "\n{}",
            p.green(format!("Found {} users in file", identifiers.len()))
        );

        let answer = self
            .ask(&format!("\n{}", p.yellow("Are these User IDs? (y/N): ")))
            .await?;
        let by_id = answer.eq_ignore_ascii_case("y");

        Ok(Some((identifiers, by_id)))
    }

    async fn scrape_multiple(&mut self) -> Result<()> {
        self.header();
        let p = self.palette();
        println!("{}\n", p.bright_yellow("SCRAPE MULTIPLE USERS"));

        let Some((identifiers, by_id)) = self.ask_identifier_file().await? else {
            return Ok(());
        };

        if let Err(e) = scrape_batch(&self.scraper, &identifiers, by_id, self.delay, &p).await {
            println!("{}", p.red(format!("❌ Error: {:#}", e)));
        }

        self.pause().await
    }

    async fn download_pictures(&mut self) -> Result<()> {
        self.header();
        let p = self.palette();
        println!("{}\n", p.bright_yellow("BATCH DOWNLOAD PROFILE PICTURES"));

        let Some((identifiers, by_id)) = self.ask_identifier_file().await? else {
            return Ok(());
        };

        download_batch(&self.scraper, &identifiers, by_id, self.delay, &p).await;
        self.pause().await
    }

    async fn export_user(&mut self) -> Result<()> {
        self.header();
        let p = self.palette();
        println!("{}\n", p.bright_yellow("EXPORT DATA TO JSON"));

        let Some(identifier) = self.ask_identifier("Username").await? else {
            return Ok(());
        };

        announce_fetch(&p);
        let outcome = self.scraper.fetch_profile(&identifier, false).await;
        match &outcome {
            Ok(record) => {
                export_json(record, Some(&self.export_path(record)), &p).await;
            }
            Err(_) => print!("{}", render_outcome(&outcome, &p)),
        }

        self.pause().await
    }

    async fn settings(&mut self) -> Result<()> {
        self.header();
        let p = self.palette();
        let colors = self.scraper.config().use_colors;
        println!("{}\n", p.bright_yellow("SETTINGS"));
        println!("{}", p.cyan("Current Settings:"));
        let state = if colors {
            p.green("Enabled")
        } else {
            p.red("Disabled")
        };
        println!("  Colors: {}", state);
        println!(
            "  Timeout: {} seconds",
            self.scraper.config().timeout.as_secs()
        );
        println!("  User Agent: {}", self.scraper.config().user_agent);
        println!();

        println!("{}", p.yellow("Options:"));
        println!("  {} - Toggle Colors", p.green("1"));
        println!("  {} - Reset to Defaults", p.green("2"));
        println!("  {} - Back", p.green("0"));

        let choice = self
            .ask(&format!("\n{}", p.yellow("Choice [0-2]: ")))
            .await?;
        match choice.as_str() {
            "1" => {
                let config = self.scraper.config_mut();
                config.use_colors = !config.use_colors;
                let state = if config.use_colors { "enabled" } else { "disabled" };
                println!(
                    "\n{}",
                    self.palette().green(format!("✅ Colors {}", state))
                );
            }
            "2" => {
                self.scraper.config_mut().use_colors = true;
                println!(
                    "\n{}",
                    self.palette().green("✅ Settings reset to defaults")
                );
            }
            _ => {}
        }

        self.pause().await
    }
}

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use nr_core::{CurrencyMatch, SystemClock};
use nr_export::ExportRow;
use nr_scrapers::cli::print_sites;
use nr_scrapers::logging::init_logging;
use nr_scrapers::{
    run_search, OutputOptions, PacingConfig, ScraperCommands, SearchArgs, WebDriverConfig,
    WebDriverPage,
};
use tracing::{info, warn};

/// A duration such as `5s`, `100ms`, `1m30s`. A bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total = Duration::ZERO;
        let mut current_number = String::new();
        let mut current_unit = String::new();
        let mut has_value = false;

        let mut flush = |number: &mut String, unit: &mut String| -> std::result::Result<(), String> {
            if number.is_empty() {
                return if unit.is_empty() {
                    Ok(())
                } else {
                    Err(format!("Unit without a number: {}", unit))
                };
            }
            let value = number
                .parse::<u64>()
                .map_err(|_| format!("Invalid number in duration: {}", number))?;
            let part = match unit.as_str() {
                "ms" => Some(Duration::from_millis(value)),
                "" | "s" => Some(Duration::from_secs(value)),
                "m" => value.checked_mul(60).map(Duration::from_secs),
                "h" => value.checked_mul(3600).map(Duration::from_secs),
                other => return Err(format!("Invalid duration unit: {}", other)),
            };
            total = part
                .and_then(|part| total.checked_add(part))
                .ok_or_else(|| "Duration too large".to_string())?;
            has_value = true;
            number.clear();
            unit.clear();
            Ok(())
        };

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                if !current_unit.is_empty() {
                    flush(&mut current_number, &mut current_unit)?;
                }
                current_number.push(c);
            } else if c.is_ascii_alphabetic() {
                current_unit.push(c);
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }
        flush(&mut current_number, &mut current_unit)?;

        if !has_value {
            return Err("Duration must include a number".to_string());
        }
        Ok(HumanDuration(total))
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum CurrencyMode {
    /// The text has to start with the amount
    Anchored,
    /// The amount may appear anywhere in the text
    Anywhere,
}

impl From<CurrencyMode> for CurrencyMatch {
    fn from(mode: CurrencyMode) -> Self {
        match mode {
            CurrencyMode::Anchored => CurrencyMatch::Anchored,
            CurrencyMode::Anywhere => CurrencyMatch::Anywhere,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Collect recent articles from news site searches", long_about = None)]
struct Cli {
    /// WebDriver server to drive the browser through
    #[arg(long, default_value = "http://localhost:4444")]
    webdriver_url: String,
    #[arg(long)]
    headless: bool,
    /// How long to wait for an element before giving up
    #[arg(long, default_value = "10s")]
    wait_timeout: HumanDuration,
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
    /// Exporter to write rows with: xlsx, json or memory
    #[arg(long, default_value = "xlsx")]
    exporter: String,
    /// Skip every pacing delay
    #[arg(long)]
    no_pacing: bool,
    #[arg(long, default_value = "1s")]
    min_delay: HumanDuration,
    #[arg(long, default_value = "5s")]
    max_delay: HumanDuration,
    #[arg(long, default_value = "100ms")]
    keystroke_delay: HumanDuration,
    /// Wait after clicks that reload the results
    #[arg(long, default_value = "2s")]
    settle_delay: HumanDuration,
    #[arg(long, value_enum, default_value = "anchored")]
    currency_match: CurrencyMode,
    /// Do not download article pictures
    #[arg(long)]
    no_pictures: bool,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: ScraperCommands,
}

impl Cli {
    fn webdriver(&self) -> WebDriverConfig {
        WebDriverConfig {
            url: self.webdriver_url.clone(),
            headless: self.headless,
            wait_timeout: self.wait_timeout.0,
        }
    }

    fn pacing(&self) -> PacingConfig {
        PacingConfig {
            min_step: self.min_delay.0,
            max_step: self.max_delay.0,
            keystroke: self.keystroke_delay.0,
            settle: self.settle_delay.0,
        }
    }

    fn output(&self) -> OutputOptions {
        OutputOptions {
            output_dir: self.output_dir.clone(),
            exporter: self.exporter.clone(),
            download_pictures: !self.no_pictures,
            currency: self.currency_match.into(),
        }
    }
}

async fn search(cli: &Cli, args: &SearchArgs) -> anyhow::Result<Vec<ExportRow>> {
    let pacer = cli.pacing().into_pacer(!cli.no_pacing);
    let page = Arc::new(
        WebDriverPage::connect(&cli.webdriver())
            .await
            .context("Failed to open a browser session")?,
    );

    let result = run_search(args, page.clone(), pacer, Arc::new(SystemClock), &cli.output()).await;

    if let Err(e) = page.close().await {
        warn!("⚠️ Failed to close browser session: {}", e);
    }

    result.with_context(|| format!("Search on {} failed", args.site.cli_name()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        ScraperCommands::Sites => print_sites(),
        ScraperCommands::Search(args) => {
            let rows = search(&cli, args).await?;
            info!(
                "✅ Exported {} articles to {}",
                rows.len(),
                cli.output_dir.display()
            );
        }
    }

    Ok(())
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Subcommand};
use nr_core::{Clock, CurrencyMatch, Error, Page, Pacer, Result, SearchRequest};
use nr_export::{create_exporter, export_articles, ExportRow, PictureDownloader};
use serde::Deserialize;
use serde_json::Value;

use crate::engine::CollectionEngine;
use crate::scrapers::SiteKind;

pub const DEFAULT_PHRASE: &str = "ai";
pub const DEFAULT_SECTION: &str = "health";
pub const DEFAULT_MONTHS_AGO: u32 = 1;

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Search a site and export the articles found
    Search(SearchArgs),
    /// List available sites and their sections
    Sites,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// The site to search
    #[arg(long, value_enum, default_value = "reuters")]
    pub site: SiteKind,
    /// Search phrase (overrides the payload)
    #[arg(long)]
    pub phrase: Option<String>,
    /// Section to filter by; ignored if the site does not offer it
    #[arg(long)]
    pub section: Option<String>,
    /// How many months back to collect; 0 keeps only the current month
    #[arg(long)]
    pub months_ago: Option<u32>,
    /// JSON work item file with `search`, `section` and `months_ago`
    #[arg(long)]
    pub payload: Option<PathBuf>,
    /// Stop after this many result pages
    #[arg(long)]
    pub max_pages: Option<usize>,
}

/// Work item parameters. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkItemPayload {
    pub search: Option<String>,
    pub section: Option<String>,
    pub months_ago: Option<u32>,
}

/// Reads the first non-null payload from a work item file. The file holds
/// either one payload object or an array of work items, each a payload
/// or a `{"payload": {...}}` wrapper.
pub fn parse_payload(body: &str) -> Result<Option<WorkItemPayload>> {
    let value: Value = serde_json::from_str(body)?;
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    for item in items {
        let payload = match item {
            Value::Object(mut fields) if fields.contains_key("payload") => {
                fields.remove("payload").unwrap_or(Value::Null)
            }
            other => other,
        };
        if payload.is_null() {
            continue;
        }
        return serde_json::from_value(payload)
            .map(Some)
            .map_err(|e| Error::InvalidRequest(format!("Invalid payload: {}", e)));
    }

    Ok(None)
}

pub async fn load_payload(path: &Path) -> Result<Option<WorkItemPayload>> {
    let body = tokio::fs::read_to_string(path).await?;
    parse_payload(&body)
}

/// Command-line flags win over the payload, which wins over the defaults.
pub fn resolve_request(args: &SearchArgs, payload: Option<WorkItemPayload>) -> Result<SearchRequest> {
    let payload = payload.unwrap_or_default();

    let phrase = args
        .phrase
        .clone()
        .or(payload.search)
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PHRASE.to_string());
    let section = args
        .section
        .clone()
        .or(payload.section)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SECTION.to_string());
    let months_ago = args
        .months_ago
        .or(payload.months_ago)
        .unwrap_or(DEFAULT_MONTHS_AGO);

    Ok(SearchRequest::new(phrase)?
        .with_section(Some(section))
        .with_months_ago(months_ago))
}

/// Where and how a search run writes its results.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    pub exporter: String,
    pub download_pictures: bool,
    pub currency: CurrencyMatch,
}

pub async fn run_search(
    args: &SearchArgs,
    page: Arc<dyn Page>,
    pacer: Arc<dyn Pacer>,
    clock: Arc<dyn Clock>,
    output: &OutputOptions,
) -> Result<Vec<ExportRow>> {
    let payload = match &args.payload {
        Some(path) => load_payload(path).await?,
        None => None,
    };
    let request = resolve_request(args, payload)?;

    let driver = args.site.build(page, pacer.clone());
    let mut engine = CollectionEngine::new(driver)
        .with_pacer(pacer)
        .with_clock(clock)
        .with_max_pages(args.max_pages);
    let articles = engine.search(&request).await?;

    let exporter = create_exporter(&output.exporter, &output.output_dir, args.site.cli_name())?;
    let downloader = output
        .download_pictures
        .then(|| PictureDownloader::new(&output.output_dir));

    export_articles(&articles, downloader.as_ref(), output.currency, exporter.as_ref()).await
}

pub fn list_sites() -> Vec<String> {
    SiteKind::all()
        .iter()
        .map(|site| {
            let sections = site.available_sections();
            if sections.is_empty() {
                format!("{} (no section filters)", site.cli_name())
            } else {
                format!("{}: {}", site.cli_name(), sections.join(", "))
            }
        })
        .collect()
}

/// The `sites` listing: a header and one indented line per site.
pub fn sites_report() -> String {
    let mut report = String::from("Available sites:\n");
    for line in list_sites() {
        report.push_str(&format!("  {}\n", line));
    }
    report
}

pub fn print_sites() {
    print!("{}", sites_report());
}

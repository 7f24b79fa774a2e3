use std::path::Path;

use async_trait::async_trait;
use nr_core::{Article, CurrencyMatch, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub mod backends;
pub mod pictures;

pub use backends::*;
pub use pictures::{picture_filename, PictureDownloader};

pub const NOT_AVAILABLE: &str = "N/A";

/// One output row per collected article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Picture filename")]
    pub picture_filename: String,
    #[serde(rename = "Count of search phrases")]
    pub search_phrase_count: usize,
    #[serde(rename = "Mentions money")]
    pub mentions_money: bool,
}

impl ExportRow {
    pub fn from_article(
        article: &Article,
        picture_filename: Option<String>,
        currency: CurrencyMatch,
    ) -> Self {
        Self {
            title: article.title().unwrap_or_default().to_string(),
            date: article.published_at().to_string(),
            description: article.description().unwrap_or(NOT_AVAILABLE).to_string(),
            picture_filename: picture_filename.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            search_phrase_count: article.search_phrase_count(),
            mentions_money: article.mentions_currency_with(currency),
        }
    }
}

#[async_trait]
pub trait ArticleExporter: Send + Sync {
    fn name(&self) -> &str;

    /// Persist a full set of rows, replacing any previous export.
    async fn export(&self, rows: &[ExportRow]) -> Result<()>;
}

/// Column headers, in row order.
pub const COLUMNS: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "Picture filename",
    "Count of search phrases",
    "Mentions money",
];

/// Builds an exporter by kind. `json` and `xlsx` write
/// `<output_dir>/<site>_news.<kind>`.
pub fn create_exporter(kind: &str, output_dir: &Path, site: &str) -> Result<Box<dyn ArticleExporter>> {
    let file = |extension: &str| output_dir.join(format!("{}_news.{}", site.to_lowercase(), extension));
    match kind {
        "json" => Ok(Box::new(JsonExporter::new(file("json")))),
        "xlsx" => Ok(Box::new(XlsxExporter::new(file("xlsx")))),
        "memory" => Ok(Box::new(MemoryExporter::new())),
        other => Err(Error::Export(format!("Unknown exporter: {}", other))),
    }
}

/// Turns articles into rows, downloading pictures when a downloader is
/// given, and hands the rows to `exporter`.
///
/// Pictures are named after the article's 1-based position. A failed
/// download is logged and exported as "N/A".
pub async fn export_articles(
    articles: &[Article],
    pictures: Option<&PictureDownloader>,
    currency: CurrencyMatch,
    exporter: &dyn ArticleExporter,
) -> Result<Vec<ExportRow>> {
    let mut rows = Vec::with_capacity(articles.len());

    for (index, article) in articles.iter().enumerate() {
        let filename = match (article.picture_url(), pictures) {
            (Some(url), Some(downloader)) => {
                let filename = picture_filename(index + 1);
                match downloader.download(url, &filename).await {
                    Ok(_) => Some(filename),
                    Err(e) => {
                        warn!("🖼️ Failed to download picture {}: {}", url, e);
                        None
                    }
                }
            }
            _ => None,
        };
        rows.push(ExportRow::from_article(article, filename, currency));
    }

    exporter.export(&rows).await?;
    info!("💾 Exported {} rows using {}", rows.len(), exporter.name());

    Ok(rows)
}

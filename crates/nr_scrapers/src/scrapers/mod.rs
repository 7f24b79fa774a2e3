use std::sync::Arc;

use async_trait::async_trait;
use nr_core::{ElementHandle, Page, Pacer, PublishDate, RawResult, Result, SiteDriver};

pub mod npr;
pub mod reuters;

pub use npr::NprDriver;
pub use reuters::ReutersDriver;

/// The sites a driver exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SiteKind {
    Reuters,
    Npr,
}

impl SiteKind {
    pub fn all() -> &'static [SiteKind] {
        &[SiteKind::Reuters, SiteKind::Npr]
    }

    pub fn cli_name(&self) -> &'static str {
        match self {
            SiteKind::Reuters => "reuters",
            SiteKind::Npr => "npr",
        }
    }

    pub fn available_sections(&self) -> &'static [&'static str] {
        match self {
            SiteKind::Reuters => reuters::SECTIONS,
            SiteKind::Npr => &[],
        }
    }

    pub fn build(self, page: Arc<dyn Page>, pacer: Arc<dyn Pacer>) -> Site {
        match self {
            SiteKind::Reuters => Site::Reuters(ReutersDriver::new(page, pacer)),
            SiteKind::Npr => Site::Npr(NprDriver::new(page, pacer)),
        }
    }
}

/// Enum that holds all possible site drivers
pub enum Site {
    Reuters(ReutersDriver),
    Npr(NprDriver),
}

#[async_trait]
impl SiteDriver for Site {
    fn name(&self) -> &str {
        match self {
            Site::Reuters(d) => d.name(),
            Site::Npr(d) => d.name(),
        }
    }

    fn base_url(&self) -> &str {
        match self {
            Site::Reuters(d) => d.base_url(),
            Site::Npr(d) => d.base_url(),
        }
    }

    fn available_sections(&self) -> &[&'static str] {
        match self {
            Site::Reuters(d) => d.available_sections(),
            Site::Npr(d) => d.available_sections(),
        }
    }

    async fn visit(&mut self) -> Result<()> {
        match self {
            Site::Reuters(d) => d.visit().await,
            Site::Npr(d) => d.visit().await,
        }
    }

    async fn open_search_bar(&mut self) -> Result<ElementHandle> {
        match self {
            Site::Reuters(d) => d.open_search_bar().await,
            Site::Npr(d) => d.open_search_bar().await,
        }
    }

    async fn open_submit_button(&mut self) -> Result<ElementHandle> {
        match self {
            Site::Reuters(d) => d.open_submit_button().await,
            Site::Npr(d) => d.open_submit_button().await,
        }
    }

    async fn sort_by_newest(&mut self) -> Result<()> {
        match self {
            Site::Reuters(d) => d.sort_by_newest().await,
            Site::Npr(d) => d.sort_by_newest().await,
        }
    }

    async fn filter_by_section(&mut self, section: &str) -> Result<()> {
        match self {
            Site::Reuters(d) => d.filter_by_section(section).await,
            Site::Npr(d) => d.filter_by_section(section).await,
        }
    }

    async fn collect_page(&mut self) -> Result<Vec<RawResult>> {
        match self {
            Site::Reuters(d) => d.collect_page().await,
            Site::Npr(d) => d.collect_page().await,
        }
    }

    async fn has_next_page(&mut self) -> Result<bool> {
        match self {
            Site::Reuters(d) => d.has_next_page().await,
            Site::Npr(d) => d.has_next_page().await,
        }
    }

    async fn advance_page(&mut self) -> Result<()> {
        match self {
            Site::Reuters(d) => d.advance_page().await,
            Site::Npr(d) => d.advance_page().await,
        }
    }

    fn parse_date(&self, raw: &str) -> Result<PublishDate> {
        match self {
            Site::Reuters(d) => d.parse_date(raw),
            Site::Npr(d) => d.parse_date(raw),
        }
    }
}

/// Common utilities for drivers
pub(crate) mod utils {
    use nr_core::{Element, Result};
    use url::Url;

    /// Substitutes `{key}` placeholders in a locator template.
    pub fn fill_locator(template: &str, values: &[(&str, &str)]) -> String {
        values.iter().fold(template.to_string(), |locator, (key, value)| {
            locator.replace(&format!("{{{}}}", key), value)
        })
    }

    /// Trimmed text of the first descendant matching `locator`.
    pub async fn text_of(element: &dyn Element, locator: &str) -> Result<Option<String>> {
        match element.find(locator).await? {
            Some(child) => Ok(Some(child.text().await?.trim().to_string())),
            None => Ok(None),
        }
    }

    pub async fn attr_of(element: &dyn Element, locator: &str, attr: &str) -> Result<Option<String>> {
        match element.find(locator).await? {
            Some(child) => child.attr(attr).await,
            None => Ok(None),
        }
    }

    /// Resolves a possibly relative `src`/`href` against the site's base URL.
    pub fn absolute_url(base_url: &str, link: &str) -> Option<String> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }
        Url::parse(base_url)
            .and_then(|base| base.join(link))
            .map(|url| url.to_string())
            .ok()
    }
}

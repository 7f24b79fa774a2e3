use async_trait::async_trait;

use crate::page::ElementHandle;
use crate::types::{PublishDate, RawResult};
use crate::{Error, Result};

/// Per-site implementation of the search results protocol.
///
/// The collection engine calls these in a fixed order: `visit`,
/// `open_search_bar`, `open_submit_button`, `sort_by_newest`,
/// `filter_by_section` (only for declared sections), then `collect_page`
/// and, while results last, `has_next_page`/`advance_page`.
#[async_trait]
pub trait SiteDriver: Send {
    /// Returns the name of the news source
    fn name(&self) -> &str;

    fn base_url(&self) -> &str;

    /// Sections this site can filter by. Empty means filtering is unsupported.
    fn available_sections(&self) -> &[&'static str] {
        &[]
    }

    fn supports_section(&self, section: &str) -> bool {
        self.available_sections().contains(&section)
    }

    /// Navigates to `base_url` and clears whatever the landing page puts
    /// in the way (cookie banners and such).
    async fn visit(&mut self) -> Result<()>;

    async fn open_search_bar(&mut self) -> Result<ElementHandle>;

    async fn open_submit_button(&mut self) -> Result<ElementHandle>;

    /// Orders results newest first. Must have settled before returning.
    async fn sort_by_newest(&mut self) -> Result<()> {
        Err(Error::unsupported(self.name(), "sort_by_newest"))
    }

    async fn filter_by_section(&mut self, section: &str) -> Result<()>;

    /// Extracts the results currently shown, in on-page order.
    async fn collect_page(&mut self) -> Result<Vec<RawResult>>;

    async fn has_next_page(&mut self) -> Result<bool> {
        Ok(false)
    }

    async fn advance_page(&mut self) -> Result<()> {
        Err(Error::unsupported(self.name(), "advance_page"))
    }

    /// Normalises the raw date of a result.
    fn parse_date(&self, raw: &str) -> Result<PublishDate> {
        PublishDate::parse(raw)
    }
}

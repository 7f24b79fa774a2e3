use std::sync::Arc;

use async_trait::async_trait;
use nr_core::{ElementHandle, Page, Pace, Pacer, RawResult, Result, SiteDriver};

use super::utils;
use crate::logging::Logger;

pub const SECTIONS: &[&str] = &[
    "World",
    "Business",
    "Legal",
    "Markets",
    "Breakingviews",
    "Technology",
    "Sustainability",
    "Science",
    "Sports",
    "Lifestyle",
];

mod locators {
    pub const SEARCH_BAR_BUTTON: &str = "button[aria-label='Open search bar']";
    pub const SEARCH_BAR_INPUT: &str = "input[type=search]";
    pub const SEARCH_SUBMIT_BUTTON: &str = "button[aria-label=Search]";
    pub const SECTION_FILTER_DROPDOWN: &str = "button#sectionfilter";
    pub const SECTION_FILTER_ITEM: &str = "li[data-key={section}]";
    pub const SORT_DROPDOWN: &str = "button#sortby";
    pub const SORT_ITEM: &str = "li[data-key={sortby}]";
    pub const RESULT_ITEM: &str = "li[class*=results__item]";
    pub const RESULT_TITLE: &str = "span[data-testid=Heading]";
    pub const RESULT_DATE: &str = "time";
    pub const RESULT_PICTURE: &str = "img";
    pub const NEXT_PAGE_BUTTON: &str = "button[aria-label^='Next stories']";
}

/// Reuters search. Results come in numbered pages with a "next" button;
/// sections are picked from a dropdown that reloads the results.
pub struct ReutersDriver {
    page: Arc<dyn Page>,
    pacer: Arc<dyn Pacer>,
    logger: Logger,
}

impl ReutersDriver {
    const BASE_URL: &'static str = "https://www.reuters.com";

    pub fn new(page: Arc<dyn Page>, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            page,
            pacer,
            logger: Logger::new().with_prefix("reuters"),
        }
    }
}

#[async_trait]
impl SiteDriver for ReutersDriver {
    fn name(&self) -> &str {
        "reuters"
    }

    fn base_url(&self) -> &str {
        Self::BASE_URL
    }

    fn available_sections(&self) -> &[&'static str] {
        SECTIONS
    }

    async fn visit(&mut self) -> Result<()> {
        self.logger.info(&format!("Opening {}", Self::BASE_URL));
        self.page.goto(Self::BASE_URL).await
    }

    async fn open_search_bar(&mut self) -> Result<ElementHandle> {
        self.logger.debug("Getting search bar button");
        self.page.wait_for(locators::SEARCH_BAR_BUTTON).await?.click().await?;

        self.pacer.pause(Pace::Step).await;

        self.logger.debug("Getting search bar input");
        self.page.wait_for(locators::SEARCH_BAR_INPUT).await
    }

    async fn open_submit_button(&mut self) -> Result<ElementHandle> {
        self.logger.debug("Getting search bar submit button");
        self.page.wait_for(locators::SEARCH_SUBMIT_BUTTON).await
    }

    async fn sort_by_newest(&mut self) -> Result<()> {
        self.logger.debug("Opening sort dropdown");
        self.page.wait_for(locators::SORT_DROPDOWN).await?.click().await?;

        self.pacer.pause(Pace::Step).await;

        self.logger.debug("Picking newest first");
        let item = utils::fill_locator(locators::SORT_ITEM, &[("sortby", "Newest")]);
        self.page.wait_for(&item).await?.click().await?;

        self.pacer.pause(Pace::Settle).await;
        Ok(())
    }

    async fn filter_by_section(&mut self, section: &str) -> Result<()> {
        if !self.supports_section(section) {
            self.logger.debug(&format!("Ignoring unknown section {:?}", section));
            return Ok(());
        }

        self.logger.debug("Opening section dropdown");
        self.page.wait_for(locators::SECTION_FILTER_DROPDOWN).await?.click().await?;

        self.pacer.pause(Pace::Step).await;

        self.logger.debug(&format!("Picking section {}", section));
        let item = utils::fill_locator(locators::SECTION_FILTER_ITEM, &[("section", section)]);
        self.page.wait_for(&item).await?.click().await?;

        // Picking a section reloads the results
        self.pacer.pause(Pace::Settle).await;
        Ok(())
    }

    async fn collect_page(&mut self) -> Result<Vec<RawResult>> {
        let items = self.page.find_all(locators::RESULT_ITEM).await?;
        let mut results = Vec::with_capacity(items.len());

        for item in &items {
            let item = &**item;
            let date = utils::attr_of(item, locators::RESULT_DATE, "datetime")
                .await?
                .unwrap_or_default();
            let title = utils::text_of(item, locators::RESULT_TITLE)
                .await?
                .unwrap_or_default();
            let picture_url = utils::attr_of(item, locators::RESULT_PICTURE, "src")
                .await?
                .and_then(|src| utils::absolute_url(Self::BASE_URL, &src));

            self.logger.debug(&format!("{} | {} | {:?}", date, title, picture_url));
            results.push(RawResult {
                title,
                description: None,
                date,
                picture_url,
            });
        }

        Ok(results)
    }

    async fn has_next_page(&mut self) -> Result<bool> {
        match self.page.find(locators::NEXT_PAGE_BUTTON).await? {
            Some(button) => Ok(button.is_visible().await? && button.attr("disabled").await?.is_none()),
            None => Ok(false),
        }
    }

    async fn advance_page(&mut self) -> Result<()> {
        self.logger.debug("Going to next page");
        self.page.wait_for(locators::NEXT_PAGE_BUTTON).await?.click().await?;
        self.pacer.pause(Pace::Settle).await;
        Ok(())
    }
}

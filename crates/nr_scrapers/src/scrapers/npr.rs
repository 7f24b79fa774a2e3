use std::sync::Arc;

use async_trait::async_trait;
use nr_core::{ElementHandle, Page, Pace, Pacer, RawResult, Result, SiteDriver};

use super::utils;
use crate::logging::Logger;

mod locators {
    pub const CLOSE_COOKIE_SETTINGS_BUTTON: &str = "div#onetrust-close-btn-container";
    pub const SEARCH_BAR_BUTTON: &str = "a#navigation_dropdown-search";
    pub const SEARCH_BAR_INPUT: &str = "div.non-hidden-search input[type=search]";
    pub const SEARCH_SUBMIT_BUTTON: &str = "div.non-hidden-search button[type=submit]";
    pub const SORT_LINKS: &str = "div.sortType a";
    pub const RESULT_ITEM: &str = "article.item";
    pub const RESULT_TITLE: &str = "h2.title";
    pub const RESULT_DESCRIPTION: &str = "p.teaser";
    pub const RESULT_DATE: &str = "time";
    pub const RESULT_PICTURE: &str = "img";
}

/// NPR search. Results load with ajax on a single page and there are no
/// section filters.
pub struct NprDriver {
    page: Arc<dyn Page>,
    pacer: Arc<dyn Pacer>,
    logger: Logger,
}

impl NprDriver {
    const BASE_URL: &'static str = "https://www.npr.org";

    pub fn new(page: Arc<dyn Page>, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            page,
            pacer,
            logger: Logger::new().with_prefix("npr"),
        }
    }

    async fn close_cookie_settings(&self) -> Result<()> {
        if let Some(button) = self.page.find(locators::CLOSE_COOKIE_SETTINGS_BUTTON).await? {
            if button.is_visible().await? {
                self.logger.debug("Closing cookie settings");
                button.click().await?;
                self.pacer.pause(Pace::Step).await;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SiteDriver for NprDriver {
    fn name(&self) -> &str {
        "npr"
    }

    fn base_url(&self) -> &str {
        Self::BASE_URL
    }

    async fn visit(&mut self) -> Result<()> {
        self.logger.info(&format!("Opening {}", Self::BASE_URL));
        self.page.goto(Self::BASE_URL).await?;
        self.close_cookie_settings().await
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
        self.logger.debug("Looking for the newest sort link");
        for link in self.page.find_all(locators::SORT_LINKS).await? {
            if link.text().await?.trim().eq_ignore_ascii_case("newest") && link.is_visible().await? {
                link.click().await?;
                break;
            }
        }

        // Results arrive through ajax with no completion marker
        self.pacer.pause(Pace::Settle).await;
        Ok(())
    }

    async fn filter_by_section(&mut self, section: &str) -> Result<()> {
        self.logger.debug(&format!("No section filters, ignoring {:?}", section));
        Ok(())
    }

    async fn collect_page(&mut self) -> Result<Vec<RawResult>> {
        let items = self.page.find_all(locators::RESULT_ITEM).await?;
        let mut results = Vec::with_capacity(items.len());

        for item in &items {
            let item = &**item;

            // Some articles come without a picture, or with a hidden placeholder
            let mut picture_url = None;
            if let Some(img) = item.find(locators::RESULT_PICTURE).await? {
                if img.is_visible().await? {
                    picture_url = img
                        .attr("src")
                        .await?
                        .and_then(|src| utils::absolute_url(Self::BASE_URL, &src));
                }
            }
            let date = utils::attr_of(item, locators::RESULT_DATE, "datetime")
                .await?
                .unwrap_or_default();
            let description = utils::text_of(item, locators::RESULT_DESCRIPTION).await?;
            let title = utils::text_of(item, locators::RESULT_TITLE)
                .await?
                .unwrap_or_default();

            self.logger.debug(&format!(
                "{} | {:?} | {} | {:?}",
                date, picture_url, title, description
            ));
            results.push(RawResult {
                title,
                description,
                date,
                picture_url,
            });
        }

        Ok(results)
    }
}

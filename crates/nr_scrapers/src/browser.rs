//! WebDriver-backed [`Page`] implementation.
//!
//! Talks to a running WebDriver server (geckodriver by default) through
//! `fantoccini`. Locators are CSS selectors.

use std::time::Duration;

use async_trait::async_trait;
use fantoccini::elements::Element as WebElement;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use nr_core::{Element, ElementHandle, Error, Page, Result};
use serde_json::json;
use tracing::info;

#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub url: String,
    pub headless: bool,
    /// How long `wait_for` polls before giving up on an element.
    pub wait_timeout: Duration,
}

pub struct WebDriverPage {
    client: Client,
    wait_timeout: Duration,
}

impl WebDriverPage {
    pub async fn connect(config: &WebDriverConfig) -> Result<Self> {
        let mut capabilities = serde_json::Map::new();
        if config.headless {
            capabilities.insert("moz:firefoxOptions".to_string(), json!({ "args": ["-headless"] }));
        }

        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities);
        let client = builder
            .connect(&config.url)
            .await
            .map_err(|e| Error::Browser(format!("Failed to connect to {}: {}", config.url, e)))?;

        info!("🌐 Browser session opened on {}", config.url);
        Ok(Self {
            client,
            wait_timeout: config.wait_timeout,
        })
    }

    /// Ends the browser session.
    pub async fn close(&self) -> Result<()> {
        self.client.clone().close().await.map_err(browser_error)
    }
}

fn browser_error(e: CmdError) -> Error {
    Error::Browser(e.to_string())
}

fn handle(element: WebElement) -> ElementHandle {
    Box::new(WebDriverElement(element))
}

/// Maps "no such element" to `None`.
fn optional(found: std::result::Result<WebElement, CmdError>) -> Result<Option<ElementHandle>> {
    match found {
        Ok(element) => Ok(Some(handle(element))),
        Err(e) if e.is_no_such_element() => Ok(None),
        Err(e) => Err(browser_error(e)),
    }
}

/// A wait that ran out or found nothing means the element is not there.
fn wait_error(locator: &str, e: CmdError) -> Error {
    match e {
        CmdError::WaitTimeout => Error::ElementNotFound(locator.to_string()),
        e if e.is_no_such_element() => Error::ElementNotFound(locator.to_string()),
        e => browser_error(e),
    }
}

#[async_trait]
impl Page for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await.map_err(browser_error)
    }

    async fn wait_for(&self, locator: &str) -> Result<ElementHandle> {
        self.client
            .wait()
            .at_most(self.wait_timeout)
            .for_element(Locator::Css(locator))
            .await
            .map(handle)
            .map_err(|e| wait_error(locator, e))
    }

    async fn find(&self, locator: &str) -> Result<Option<ElementHandle>> {
        optional(self.client.find(Locator::Css(locator)).await)
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<ElementHandle>> {
        let elements = self
            .client
            .find_all(Locator::Css(locator))
            .await
            .map_err(browser_error)?;
        Ok(elements.into_iter().map(handle).collect())
    }
}

struct WebDriverElement(WebElement);

#[async_trait]
impl Element for WebDriverElement {
    async fn click(&self) -> Result<()> {
        self.0.click().await.map_err(browser_error)
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        self.0.send_keys(text).await.map_err(browser_error)
    }

    async fn text(&self) -> Result<String> {
        self.0.text().await.map_err(browser_error)
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        self.0.attr(name).await.map_err(browser_error)
    }

    async fn is_visible(&self) -> Result<bool> {
        self.0.is_displayed().await.map_err(browser_error)
    }

    async fn find(&self, locator: &str) -> Result<Option<ElementHandle>> {
        optional(self.0.find(Locator::Css(locator)).await)
    }
}

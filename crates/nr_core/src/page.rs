use async_trait::async_trait;

use crate::Result;

pub type ElementHandle = Box<dyn Element>;

/// A node on the page the browser is currently showing.
#[async_trait]
pub trait Element: Send + Sync {
    async fn click(&self) -> Result<()>;

    /// Types `text` into the element as keyboard input.
    async fn type_text(&self, text: &str) -> Result<()>;

    /// Visible text content of the element.
    async fn text(&self) -> Result<String>;

    async fn attr(&self, name: &str) -> Result<Option<String>>;

    async fn is_visible(&self) -> Result<bool>;

    /// First descendant matching the CSS `locator`, if any.
    async fn find(&self, locator: &str) -> Result<Option<ElementHandle>>;
}

/// Browser session capability used by the site drivers.
#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    /// Waits until `locator` is present, failing with
    /// [`Error::ElementNotFound`](crate::Error::ElementNotFound) once the
    /// backend's own timeout runs out.
    async fn wait_for(&self, locator: &str) -> Result<ElementHandle>;

    async fn find(&self, locator: &str) -> Result<Option<ElementHandle>>;

    async fn find_all(&self, locator: &str) -> Result<Vec<ElementHandle>>;
}

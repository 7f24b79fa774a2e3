use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use nr_core::{
    Element, ElementHandle, Error, FixedClock, Page, Pace, Pacer, RawResult, Result, SiteDriver,
};

/// Shared record of every interaction, in call order.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn record(log: &Log, entry: String) {
    log.lock().unwrap().push(entry);
}

pub fn clock(year: i32, month: u32, day: u32) -> Arc<FixedClock> {
    Arc::new(FixedClock(NaiveDate::from_ymd_opt(year, month, day).unwrap()))
}

pub fn raw(title: &str, date: &str) -> RawResult {
    RawResult {
        title: title.to_string(),
        date: date.to_string(),
        ..Default::default()
    }
}

#[derive(Debug, Clone)]
pub struct FakeElement {
    name: String,
    text: String,
    attrs: HashMap<String, String>,
    visible: bool,
    children: HashMap<String, FakeElement>,
    log: Log,
}

impl FakeElement {
    pub fn new(name: &str, log: &Log) -> Self {
        Self {
            name: name.to_string(),
            text: String::new(),
            attrs: HashMap::new(),
            visible: true,
            children: HashMap::new(),
            log: log.clone(),
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, locator: &str, child: FakeElement) -> Self {
        self.children.insert(locator.to_string(), child);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[async_trait]
impl Element for FakeElement {
    async fn click(&self) -> Result<()> {
        record(&self.log, format!("click:{}", self.name));
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        record(&self.log, format!("type:{}:{}", self.name, text));
        Ok(())
    }

    async fn text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.attrs.get(name).cloned())
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self.visible)
    }

    async fn find(&self, locator: &str) -> Result<Option<ElementHandle>> {
        Ok(self
            .children
            .get(locator)
            .cloned()
            .map(|child| Box::new(child) as ElementHandle))
    }
}

/// A page whose elements never change; locators map straight to elements.
#[derive(Debug, Clone)]
pub struct FakePage {
    elements: HashMap<String, Vec<FakeElement>>,
    log: Log,
}

impl FakePage {
    pub fn new(log: &Log) -> Self {
        Self {
            elements: HashMap::new(),
            log: log.clone(),
        }
    }

    pub fn with(mut self, locator: &str, element: FakeElement) -> Self {
        self.elements.entry(locator.to_string()).or_default().push(element);
        self
    }

    /// Registers a clickable element named after its locator.
    pub fn with_button(self, locator: &str) -> Self {
        let button = FakeElement::new(locator, &self.log);
        self.with(locator, button)
    }

    fn first(&self, locator: &str) -> Option<ElementHandle> {
        self.elements
            .get(locator)
            .and_then(|all| all.first())
            .cloned()
            .map(|element| Box::new(element) as ElementHandle)
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        record(&self.log, format!("goto:{}", url));
        Ok(())
    }

    async fn wait_for(&self, locator: &str) -> Result<ElementHandle> {
        self.first(locator)
            .ok_or_else(|| Error::ElementNotFound(locator.to_string()))
    }

    async fn find(&self, locator: &str) -> Result<Option<ElementHandle>> {
        Ok(self.first(locator))
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<ElementHandle>> {
        Ok(self
            .elements
            .get(locator)
            .map(|all| {
                all.iter()
                    .cloned()
                    .map(|element| Box::new(element) as ElementHandle)
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    paces: Arc<Mutex<Vec<Pace>>>,
}

impl RecordingPacer {
    pub fn count(&self, pace: Pace) -> usize {
        self.paces.lock().unwrap().iter().filter(|p| **p == pace).count()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, pace: Pace) {
        self.paces.lock().unwrap().push(pace);
    }
}

/// Serves scripted result pages and logs every protocol call.
pub struct MockDriver {
    pub sections: Vec<&'static str>,
    pub pages: Vec<Vec<RawResult>>,
    pub sortable: bool,
    /// Fails the nth (1-based) call of the named step with `ElementNotFound`.
    pub fail_on: Option<(&'static str, usize)>,
    page_index: usize,
    calls: HashMap<String, usize>,
    log: Log,
}

impl MockDriver {
    pub fn new(pages: Vec<Vec<RawResult>>, log: &Log) -> Self {
        Self {
            sections: Vec::new(),
            pages,
            sortable: true,
            fail_on: None,
            page_index: 0,
            calls: HashMap::new(),
            log: log.clone(),
        }
    }

    pub fn with_sections(mut self, sections: Vec<&'static str>) -> Self {
        self.sections = sections;
        self
    }

    pub fn failing_on(mut self, step: &'static str, nth: usize) -> Self {
        self.fail_on = Some((step, nth));
        self
    }

    fn call(&mut self, name: &str) -> Result<()> {
        record(&self.log, name.to_string());
        let step = name.split(':').next().unwrap_or(name);
        let count = self.calls.entry(step.to_string()).or_default();
        *count += 1;
        match self.fail_on {
            Some((failing, nth)) if failing == step && nth == *count => {
                Err(Error::ElementNotFound(step.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SiteDriver for MockDriver {
    fn name(&self) -> &str {
        "mock"
    }

    fn base_url(&self) -> &str {
        "https://news.example"
    }

    fn available_sections(&self) -> &[&'static str] {
        &self.sections
    }

    async fn visit(&mut self) -> Result<()> {
        self.call("visit")
    }

    async fn open_search_bar(&mut self) -> Result<ElementHandle> {
        self.call("open_search_bar")?;
        Ok(Box::new(FakeElement::new("search_bar", &self.log)))
    }

    async fn open_submit_button(&mut self) -> Result<ElementHandle> {
        self.call("open_submit_button")?;
        Ok(Box::new(FakeElement::new("submit", &self.log)))
    }

    async fn sort_by_newest(&mut self) -> Result<()> {
        if !self.sortable {
            return Err(Error::unsupported(self.name(), "sort_by_newest"));
        }
        self.call("sort_by_newest")
    }

    async fn filter_by_section(&mut self, section: &str) -> Result<()> {
        self.call(&format!("filter_by_section:{}", section))
    }

    async fn collect_page(&mut self) -> Result<Vec<RawResult>> {
        self.call("collect_page")?;
        Ok(self.pages.get(self.page_index).cloned().unwrap_or_default())
    }

    async fn has_next_page(&mut self) -> Result<bool> {
        self.call("has_next_page")?;
        Ok(self.page_index + 1 < self.pages.len())
    }

    async fn advance_page(&mut self) -> Result<()> {
        self.call("advance_page")?;
        self.page_index += 1;
        Ok(())
    }
}

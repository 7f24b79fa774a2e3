use std::sync::Arc;

use nr_core::{
    Article, Clock, Element, NoPacing, Pace, Pacer, Result, SearchRequest, SiteDriver,
    SystemClock, YearMonth,
};
use tracing::{debug, info, warn};

/// Why the page loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// An item older than the cutoff month was reached.
    Cutoff,
    /// The driver reported no further pages.
    Exhausted,
    /// The configured page limit was reached.
    PageLimit,
}

/// Runs the search protocol against one site driver and collects the
/// articles published on or after the cutoff month.
pub struct CollectionEngine<D> {
    driver: D,
    pacer: Arc<dyn Pacer>,
    clock: Arc<dyn Clock>,
    max_pages: Option<usize>,
}

impl<D: SiteDriver> CollectionEngine<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            pacer: Arc::new(NoPacing),
            clock: Arc::new(SystemClock),
            max_pages: None,
        }
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages.filter(|max| *max > 0);
        self
    }

    /// The oldest month still collected: today's month minus `months_ago`.
    pub fn cutoff(&self, months_ago: u32) -> YearMonth {
        YearMonth::from(self.clock.today()).months_before(months_ago)
    }

    /// Searches the site and returns matching articles newest first.
    ///
    /// Any driver error aborts the whole run; nothing collected so far is
    /// returned in that case.
    pub async fn search(&mut self, request: &SearchRequest) -> Result<Vec<Article>> {
        let phrase = request.phrase();
        info!("🔎 Searching {} for {:?}", self.driver.name(), phrase);

        debug!("Visiting {}", self.driver.base_url());
        self.driver.visit().await?;
        self.pacer.pause(Pace::Step).await;

        let search_bar = self.driver.open_search_bar().await?;
        self.type_phrase(search_bar.as_ref(), phrase).await?;

        self.pacer.pause(Pace::Step).await;
        self.driver.open_submit_button().await?.click().await?;

        self.pacer.pause(Pace::Step).await;
        self.driver.sort_by_newest().await?;

        if let Some(section) = request.section().filter(|s| !s.trim().is_empty()) {
            if self.driver.supports_section(section) {
                self.pacer.pause(Pace::Step).await;
                self.driver.filter_by_section(section).await?;
            } else {
                debug!(
                    "Section {:?} is not offered by {}, not filtering",
                    section,
                    self.driver.name()
                );
            }
        }

        let cutoff = self.cutoff(request.months_ago());
        let (mut articles, reason) = self.collect(cutoff).await?;

        for article in &mut articles {
            article.count_search_phrase(phrase);
        }

        info!(
            "📰 Collected {} articles from {} since {} ({:?})",
            articles.len(),
            self.driver.name(),
            cutoff,
            reason
        );
        Ok(articles)
    }

    async fn type_phrase(&self, search_bar: &dyn Element, phrase: &str) -> Result<()> {
        for c in phrase.chars() {
            search_bar.type_text(&c.to_string()).await?;
            self.pacer.pause(Pace::Keystroke).await;
        }
        Ok(())
    }

    /// Walks result pages until an item falls before `cutoff` or the pages
    /// run out. Relies on the driver returning items newest first.
    async fn collect(&mut self, cutoff: YearMonth) -> Result<(Vec<Article>, StopReason)> {
        let mut articles = Vec::new();
        let mut page_number = 1;

        loop {
            let results = self.driver.collect_page().await?;
            debug!("📄 Page {} has {} results", page_number, results.len());

            for raw in results {
                let published_at = match self.driver.parse_date(&raw.date) {
                    Ok(date) => date,
                    Err(e) => {
                        warn!("⚠️ Skipping result {:?}: {}", raw.title, e);
                        continue;
                    }
                };

                if published_at.year_month() < cutoff {
                    debug!(
                        "Reached {} on page {}, older than {}",
                        published_at, page_number, cutoff
                    );
                    return Ok((articles, StopReason::Cutoff));
                }

                articles.push(Article::from_raw(raw, published_at));
            }

            if self.max_pages.is_some_and(|max| page_number >= max) {
                return Ok((articles, StopReason::PageLimit));
            }
            if !self.driver.has_next_page().await? {
                return Ok((articles, StopReason::Exhausted));
            }

            self.pacer.pause(Pace::Step).await;
            self.driver.advance_page().await?;
            page_number += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{clock, entries, new_log, raw, MockDriver, RecordingPacer};
    use nr_core::Error;

    fn titles(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.title().unwrap_or_default()).collect()
    }

    fn engine(driver: MockDriver) -> CollectionEngine<MockDriver> {
        CollectionEngine::new(driver).with_clock(clock(2024, 5, 15))
    }

    #[tokio::test]
    async fn test_stops_mid_page_three() {
        let log = new_log();
        let driver = MockDriver::new(
            vec![
                vec![raw("p1a", "2024-05-10"), raw("p1b", "2024-05-02")],
                vec![raw("p2a", "2024-04-28"), raw("p2b", "2024-04-01")],
                vec![raw("p3a", "2024-04-01"), raw("stale", "2024-03-31"), raw("p3c", "2024-04-20")],
                vec![raw("p4a", "2024-04-30")],
            ],
            &log,
        );
        let mut engine = engine(driver);
        let request = SearchRequest::new("ai").unwrap().with_months_ago(1);

        let articles = engine.search(&request).await.unwrap();

        assert_eq!(titles(&articles), vec!["p1a", "p1b", "p2a", "p2b", "p3a"]);
        let calls = entries(&log);
        assert_eq!(calls.iter().filter(|c| *c == "collect_page").count(), 3);
        assert_eq!(calls.iter().filter(|c| *c == "advance_page").count(), 2);
        assert_eq!(calls.last().map(String::as_str), Some("collect_page"));
    }

    #[tokio::test]
    async fn test_protocol_order() {
        let log = new_log();
        let driver = MockDriver::new(vec![vec![raw("a", "2024-05-01")]], &log)
            .with_sections(vec!["World"]);
        let mut engine = engine(driver);
        let request = SearchRequest::new("ai")
            .unwrap()
            .with_section(Some("World".to_string()));

        engine.search(&request).await.unwrap();

        assert_eq!(
            entries(&log),
            vec![
                "visit",
                "open_search_bar",
                "type:search_bar:a",
                "type:search_bar:i",
                "open_submit_button",
                "click:submit",
                "sort_by_newest",
                "filter_by_section:World",
                "collect_page",
                "has_next_page",
            ]
        );
    }

    #[tokio::test]
    async fn test_months_ago_zero_keeps_only_current_month() {
        let log = new_log();
        let driver = MockDriver::new(
            vec![vec![
                raw("today", "2024-05-15"),
                raw("first of month", "2024-05-01"),
                raw("one day ago", "2024-04-30"),
                raw("after stop", "2024-05-20"),
            ]],
            &log,
        );
        let mut engine = engine(driver);

        let articles = engine.search(&SearchRequest::new("ai").unwrap()).await.unwrap();

        assert_eq!(titles(&articles), vec!["today", "first of month"]);
    }

    #[tokio::test]
    async fn test_cutoff_is_month_granular() {
        let log = new_log();
        // Two months back from mid-May is mid-March, but all of March stays.
        let driver = MockDriver::new(
            vec![vec![raw("march 1st", "2024-03-01"), raw("february", "2024-02-29")]],
            &log,
        );
        let mut engine = engine(driver);
        let request = SearchRequest::new("ai").unwrap().with_months_ago(2);

        let articles = engine.search(&request).await.unwrap();

        assert_eq!(titles(&articles), vec!["march 1st"]);
    }

    #[tokio::test]
    async fn test_collection_is_a_prefix_of_newest_first_results() {
        let dates = [
            "2024-05-09", "2024-04-30", "2024-04-02", "2024-03-15", "2024-02-01", "2023-12-24",
        ];
        for months_ago in 0..6 {
            let log = new_log();
            let page = dates.iter().map(|d| raw(d, d)).collect::<Vec<_>>();
            let mut engine = engine(MockDriver::new(vec![page], &log));
            let cutoff = engine.cutoff(months_ago);
            let request = SearchRequest::new("ai").unwrap().with_months_ago(months_ago);

            let articles = engine.search(&request).await.unwrap();

            let expected: Vec<&str> = dates
                .iter()
                .copied()
                .take_while(|d| nr_core::PublishDate::parse(d).unwrap().year_month() >= cutoff)
                .collect();
            assert_eq!(titles(&articles), expected, "months_ago = {}", months_ago);
        }
    }

    #[tokio::test]
    async fn test_undeclared_section_matches_no_section() {
        let pages = vec![vec![raw("a", "2024-05-01")]];

        let with_none = new_log();
        let mut engine_none = engine(
            MockDriver::new(pages.clone(), &with_none).with_sections(vec!["World", "Business"]),
        );
        engine_none.search(&SearchRequest::new("ai").unwrap()).await.unwrap();

        for section in ["Gardening", "", "   "] {
            let log = new_log();
            let mut engine_other = engine(
                MockDriver::new(pages.clone(), &log).with_sections(vec!["World", "Business"]),
            );
            let request = SearchRequest::new("ai")
                .unwrap()
                .with_section(Some(section.to_string()));
            engine_other.search(&request).await.unwrap();

            assert_eq!(entries(&log), entries(&with_none), "section {:?}", section);
        }
    }

    #[tokio::test]
    async fn test_unparseable_dates_are_skipped() {
        let log = new_log();
        let driver = MockDriver::new(
            vec![vec![
                raw("good", "2024-05-10"),
                raw("broken", "sometime last week"),
                raw("also good", "2024-05-03T08:00:00Z"),
            ]],
            &log,
        );
        let mut engine = engine(driver);

        let articles = engine.search(&SearchRequest::new("ai").unwrap()).await.unwrap();

        assert_eq!(titles(&articles), vec!["good", "also good"]);
    }

    #[tokio::test]
    async fn test_counts_search_phrase_in_every_article() {
        let log = new_log();
        let mut first = raw("AI wave meets ", "2024-05-10");
        first.description = Some("AI ethics".to_string());
        let driver = MockDriver::new(vec![vec![first, raw("Markets", "2024-05-09")]], &log);
        let mut engine = engine(driver);

        let articles = engine.search(&SearchRequest::new("AI").unwrap()).await.unwrap();

        let counts: Vec<usize> = articles.iter().map(Article::search_phrase_count).collect();
        assert_eq!(counts, vec![2, 0]);
    }

    #[tokio::test]
    async fn test_pacing_between_steps_and_keystrokes() {
        let log = new_log();
        let pacer = RecordingPacer::default();
        let driver = MockDriver::new(
            vec![vec![raw("a", "2024-05-10")], vec![raw("b", "2024-05-09")]],
            &log,
        );
        let mut engine = engine(driver).with_pacer(Arc::new(pacer.clone()));

        engine.search(&SearchRequest::new("news").unwrap()).await.unwrap();

        assert_eq!(pacer.count(Pace::Keystroke), 4);
        // visit, submit, sort, one page advance
        assert_eq!(pacer.count(Pace::Step), 4);
    }

    #[tokio::test]
    async fn test_page_limit() {
        let log = new_log();
        let driver = MockDriver::new(
            vec![vec![raw("a", "2024-05-10")], vec![raw("b", "2024-05-09")]],
            &log,
        );
        let mut engine = engine(driver).with_max_pages(Some(1));

        let articles = engine.search(&SearchRequest::new("ai").unwrap()).await.unwrap();

        assert_eq!(titles(&articles), vec!["a"]);
        assert!(!entries(&log).contains(&"has_next_page".to_string()));
    }

    #[tokio::test]
    async fn test_unsupported_sort_aborts_the_run() {
        let log = new_log();
        let mut driver = MockDriver::new(vec![vec![raw("a", "2024-05-10")]], &log);
        driver.sortable = false;
        let mut engine = engine(driver);

        let result = engine.search(&SearchRequest::new("ai").unwrap()).await;

        assert!(matches!(result, Err(Error::UnsupportedOperation { .. })));
        assert!(!entries(&log).contains(&"collect_page".to_string()));
    }

    #[tokio::test]
    async fn test_failure_on_later_page_discards_collected_articles() {
        let log = new_log();
        let driver = MockDriver::new(
            vec![
                vec![raw("p1a", "2024-05-10"), raw("p1b", "2024-05-09")],
                vec![raw("p2a", "2024-05-08")],
            ],
            &log,
        )
        .failing_on("collect_page", 2);
        let mut engine = engine(driver);

        let result = engine.search(&SearchRequest::new("ai").unwrap()).await;

        assert!(matches!(result, Err(Error::ElementNotFound(_))));
        let calls = entries(&log);
        assert_eq!(calls.iter().filter(|c| *c == "collect_page").count(), 2);
        assert_eq!(calls.last().map(String::as_str), Some("collect_page"));
    }

    #[tokio::test]
    async fn test_missing_search_bar_stops_the_protocol() {
        let log = new_log();
        let driver = MockDriver::new(vec![vec![raw("a", "2024-05-10")]], &log)
            .failing_on("open_search_bar", 1);
        let mut engine = engine(driver);

        let result = engine.search(&SearchRequest::new("ai").unwrap()).await;

        assert!(matches!(result, Err(Error::ElementNotFound(l)) if l == "open_search_bar"));
        assert_eq!(entries(&log), vec!["visit", "open_search_bar"]);
    }

    #[test]
    fn test_cutoff_borrows_across_year() {
        let log = new_log();
        let engine = CollectionEngine::new(MockDriver::new(vec![], &log))
            .with_clock(clock(2024, 1, 10));
        assert_eq!(engine.cutoff(2), YearMonth::new(2023, 11).unwrap());
        assert_eq!(engine.cutoff(0), YearMonth::new(2024, 1).unwrap());
    }
}

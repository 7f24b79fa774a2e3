use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::analysis::{self, CurrencyMatch};
use crate::error::{Error, Result};

/// A calendar month, ordered by year first and month second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Steps back `months` calendar months, borrowing from the year as needed.
    /// `2024-01` minus 2 months is `2023-11`.
    pub fn months_before(self, months: u32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 - i64::from(months);
        Self {
            year: total.div_euclid(12) as i32,
            month: total.rem_euclid(12) as u32 + 1,
        }
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Publication date of a search result. Some sites only expose the month,
/// so the day is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishDate {
    pub year: i32,
    pub month: u32,
    pub day: Option<u32>,
}

impl PublishDate {
    pub fn new(year: i32, month: u32, day: Option<u32>) -> Option<Self> {
        match day {
            Some(day) => NaiveDate::from_ymd_opt(year, month, day).map(Self::from),
            None => YearMonth::new(year, month).map(|ym| Self {
                year: ym.year,
                month: ym.month,
                day: None,
            }),
        }
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }

    /// Parses the date formats news sites put in their markup: RFC 3339
    /// `datetime` attributes, naive ISO datetimes, plain `YYYY-MM-DD`, and
    /// anything that splits on dashes into `year-month[-day...]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::date_parse(raw, "empty date"));
        }

        if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(datetime.date_naive().into());
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(datetime.date().into());
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(date.into());
        }

        Self::parse_dash_split(raw, trimmed)
    }

    fn parse_dash_split(raw: &str, trimmed: &str) -> Result<Self> {
        let mut parts = trimmed.split('-');

        let year = parts
            .next()
            .and_then(|p| p.trim().parse::<i32>().ok())
            .ok_or_else(|| Error::date_parse(raw, "missing year"))?;
        let month = parts
            .next()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .ok_or_else(|| Error::date_parse(raw, "missing month"))?;
        // The day segment may carry a time suffix, e.g. "29T12:00:00Z".
        let day = parts
            .next()
            .map(|p| {
                p.chars()
                    .take_while(char::is_ascii_digit)
                    .collect::<String>()
                    .parse::<u32>()
                    .map_err(|_| Error::date_parse(raw, "malformed day"))
            })
            .transpose()?;

        Self::new(year, month, day).ok_or_else(|| Error::date_parse(raw, "date out of range"))
    }
}

impl From<NaiveDate> for PublishDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: Some(date.day()),
        }
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.day {
            Some(day) => write!(f, "{:04}-{:02}-{:02}", self.year, self.month, day),
            None => write!(f, "{:04}-{:02}", self.year, self.month),
        }
    }
}

/// One result item as extracted from a search results page, before any
/// processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResult {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub picture_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    title: Option<String>,
    description: Option<String>,
    published_at: PublishDate,
    picture_url: Option<String>,
    search_phrase_count: usize,
}

impl Article {
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        published_at: PublishDate,
        picture_url: Option<String>,
    ) -> Self {
        Self {
            title,
            description,
            published_at,
            picture_url,
            search_phrase_count: 0,
        }
    }

    /// Wraps a raw result whose date has already been normalised.
    /// Blank strings become `None`.
    pub fn from_raw(raw: RawResult, published_at: PublishDate) -> Self {
        Self::new(
            non_blank(Some(raw.title)),
            non_blank(raw.description),
            published_at,
            non_blank(raw.picture_url),
        )
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn published_at(&self) -> PublishDate {
        self.published_at
    }

    pub fn picture_url(&self) -> Option<&str> {
        self.picture_url.as_deref()
    }

    /// Title followed by description; missing parts count as empty.
    pub fn content(&self) -> String {
        let mut content = self.title.clone().unwrap_or_default();
        content.push_str(self.description.as_deref().unwrap_or_default());
        content
    }

    pub fn mentions_currency(&self) -> bool {
        self.mentions_currency_with(CurrencyMatch::Anchored)
    }

    pub fn mentions_currency_with(&self, mode: CurrencyMatch) -> bool {
        mode.matches(&self.content())
    }

    pub fn search_phrase_count(&self) -> usize {
        self.search_phrase_count
    }

    pub fn count_search_phrase(&mut self, phrase: &str) -> usize {
        self.search_phrase_count = analysis::phrase_count(&self.content(), phrase);
        self.search_phrase_count
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parameters of one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    phrase: String,
    section: Option<String>,
    months_ago: u32,
}

impl SearchRequest {
    pub fn new(phrase: impl Into<String>) -> Result<Self> {
        let phrase = phrase.into();
        if phrase.trim().is_empty() {
            return Err(Error::InvalidRequest("search phrase must not be empty".to_string()));
        }
        Ok(Self {
            phrase,
            section: None,
            months_ago: 0,
        })
    }

    pub fn with_section(mut self, section: Option<String>) -> Self {
        self.section = section;
        self
    }

    /// `0` keeps only the current month.
    pub fn with_months_ago(mut self, months_ago: u32) -> Self {
        self.months_ago = months_ago;
        self
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn months_ago(&self) -> u32 {
        self.months_ago
    }
}

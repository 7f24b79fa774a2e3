//! Content analysis over article text.
//!
//! Money amounts come in two shapes:
//! - a dollar sign followed by 1 to 3 digits, any number of `,ddd`
//!   thousands groups and up to two decimals (`$11.1`, `$111,111.11`)
//! - any number of digits followed by ` dollars` or ` USD`

use lazy_static::lazy_static;
use regex::Regex;

const MONEY_PATTERN: &str = r"\$\d{1,3}(?:,\d{3})*(?:\.\d{1,2})?|\d+ (?:dollars|USD)";

lazy_static! {
    static ref MONEY_AT_START: Regex = Regex::new(&format!("^(?:{MONEY_PATTERN})")).unwrap();
    static ref MONEY_ANYWHERE: Regex = Regex::new(MONEY_PATTERN).unwrap();
}

/// Where in the text a money amount has to appear to count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurrencyMatch {
    /// The text has to start with the amount.
    #[default]
    Anchored,
    Anywhere,
}

impl CurrencyMatch {
    pub fn matches(self, text: &str) -> bool {
        match self {
            CurrencyMatch::Anchored => mentions_currency(text),
            CurrencyMatch::Anywhere => mentions_currency_anywhere(text),
        }
    }
}

/// True when `text` starts with a money amount.
pub fn mentions_currency(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    MONEY_AT_START.is_match(text)
}

pub fn mentions_currency_anywhere(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    MONEY_ANYWHERE.is_match(text)
}

/// Number of non-overlapping matches of `phrase` in `text`. The phrase is
/// used as a case-sensitive regex; one that does not compile is matched
/// literally instead.
pub fn phrase_count(text: &str, phrase: &str) -> usize {
    match Regex::new(phrase) {
        Ok(pattern) => pattern.find_iter(text).count(),
        Err(_) => text.matches(phrase).count(),
    }
}

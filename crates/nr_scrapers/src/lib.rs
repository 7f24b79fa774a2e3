pub mod browser;
pub mod cli;
pub mod engine;
pub mod logging;
pub mod pacing;
pub mod scrapers;

#[cfg(test)]
mod test_utils;

pub use browser::{WebDriverConfig, WebDriverPage};
pub use cli::{run_search, OutputOptions, ScraperCommands, SearchArgs};
pub use engine::{CollectionEngine, StopReason};
pub use pacing::{PacingConfig, RandomPacer};
pub use scrapers::{Site, SiteKind};

pub mod prelude {
    pub use nr_core::{Article, Error, Result, SearchRequest, SiteDriver};
    pub use super::engine::CollectionEngine;
}

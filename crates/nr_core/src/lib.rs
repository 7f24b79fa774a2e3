pub mod analysis;
pub mod clock;
pub mod driver;
pub mod error;
pub mod page;
pub mod pacing;
pub mod types;

pub use analysis::CurrencyMatch;
pub use clock::{Clock, FixedClock, SystemClock};
pub use driver::SiteDriver;
pub use error::{Error, Result};
pub use page::{Element, ElementHandle, Page};
pub use pacing::{NoPacing, Pace, Pacer};
pub use types::{Article, PublishDate, RawResult, SearchRequest, YearMonth};

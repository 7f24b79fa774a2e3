use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("{site} does not support {operation}")]
    UnsupportedOperation {
        site: String,
        operation: &'static str,
    },

    #[error("Could not parse date {raw:?}: {reason}")]
    DateParse { raw: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    pub fn unsupported(site: impl Into<String>, operation: &'static str) -> Self {
        Error::UnsupportedOperation {
            site: site.into(),
            operation,
        }
    }

    pub(crate) fn date_parse(raw: &str, reason: impl Into<String>) -> Self {
        Error::DateParse {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error type shared by the fetchers, extractors and the batch runner.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("invalid CSS selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("`{container}` match #{index} has no `{heading}` element")]
    MissingHeading {
        container: String,
        heading: String,
        index: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<chromiumoxide::error::CdpError> for CrawlError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        CrawlError::Browser(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;

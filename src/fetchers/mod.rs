//! Page fetchers.
//!
//! Two ways of turning a URL into HTML:
//!
//! | Fetcher | Module | Notes |
//! |---------|--------|-------|
//! | Plain HTTP | [`http`] | Shared `reqwest` client, optional proxy, `file://` support |
//! | Headless Chromium | [`browser`] | Runs page scripts, one browser per call |
//!
//! Both implement [`Fetcher`] and report failures as errors. Logging and
//! swallowing them is left to [`Crawler::arun`](crate::crawler::Crawler::arun),
//! so a bad URL never takes down the batch.

pub mod browser;
pub mod http;

use crate::error::Result;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

/// Retrieves the markup for a URL.
pub trait Fetcher {
    /// Human-readable name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Fetch `url`, returning the HTML or the reason it could not be fetched.
    async fn fetch(&self, url: &str) -> Result<String>;
}

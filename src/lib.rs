//! Concurrent headline crawler.
//!
//! - [`fetchers`]: plain HTTP and headless-Chromium page retrieval
//! - [`extract`]: pluggable headline extraction from HTML
//! - [`crawler`]: fetch + extract for one URL, fan-out over many
//! - [`batch`]: crawl a URL list and write the JSON report
//! - [`outputs`]: report writers

pub mod batch;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetchers;
pub mod models;
pub mod outputs;

pub use crawler::{Crawler, CrawlerBuilder};
pub use error::{CrawlError, Result};
pub use extract::{HeadlineExtractor, SelectorExtractor};
pub use models::{CrawlReport, HeadlineList, PageOutcome, PageResult};

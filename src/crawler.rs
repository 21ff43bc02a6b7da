//! Single-URL crawl: fetch, then extract.
//!
//! The [`Crawler`] owns both fetch strategies and the extractors. Each call
//! to [`Crawler::arun`] picks a fetcher from the `use_js` flag, picks an
//! extractor from the URL's host, and folds every failure into a
//! [`PageOutcome`] so one bad page cannot affect its neighbours.

use crate::error::Result;
use crate::extract::{HeadlineExtractor, SelectorExtractor};
use crate::fetchers::browser::DEFAULT_NAVIGATION_TIMEOUT;
use crate::fetchers::http::DEFAULT_TIMEOUT;
use crate::fetchers::{BrowserFetcher, Fetcher, HttpFetcher};
use crate::models::PageOutcome;
use futures::future::join_all;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub struct Crawler {
    http: HttpFetcher,
    browser: BrowserFetcher,
    extractor: Arc<dyn HeadlineExtractor>,
    host_extractors: HashMap<String, Arc<dyn HeadlineExtractor>>,
    verbose: bool,
}

impl Crawler {
    /// Crawler with default settings and the tease-card extractor.
    pub fn new(verbose: bool) -> Result<Self> {
        Self::builder().verbose(verbose).build()
    }

    /// Start configuring a crawler. Unset options fall back to the fetcher
    /// defaults (30 s HTTP timeout, 60 s navigation timeout, no proxy).
    pub fn builder() -> CrawlerBuilder {
        CrawlerBuilder::default()
    }

    /// Whether per-URL status lines are logged at `info`.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Crawl one URL and return its headlines or the reason it failed.
    ///
    /// # Arguments
    ///
    /// * `url` - Page to fetch (`http`, `https` or `file`).
    /// * `use_js` - Render the page in headless Chromium instead of a plain GET.
    ///
    /// # Returns
    ///
    /// Never errors. Fetch and extraction faults are logged here and come back
    /// as [`PageResult::Failed`](crate::models::PageResult::Failed).
    #[instrument(level = "info", skip(self))]
    pub async fn arun(&self, url: &str, use_js: bool) -> PageOutcome {
        let (fetcher, fetched) = if use_js {
            (self.browser.name(), self.browser.fetch(url).await)
        } else {
            (self.http.name(), self.http.fetch(url).await)
        };

        let html = match fetched {
            Ok(html) => html,
            Err(e) => {
                warn!(%url, fetcher, error = %e, "Fetch failed");
                return PageOutcome::failed(url, e.to_string());
            }
        };

        match self.extractor_for(url).extract(&html, url) {
            Ok(headlines) => {
                debug!(%url, count = headlines.len(), "Parsed page");
                PageOutcome::headlines(url, headlines)
            }
            Err(e) => {
                error!(%url, error = %e, "Headline extraction failed");
                PageOutcome::failed(url, e.to_string())
            }
        }
    }

    /// Crawl every URL concurrently. Outcomes come back in input order.
    ///
    /// Duplicates are fetched once per occurrence.
    #[instrument(level = "info", skip_all, fields(count = urls.len(), use_js = use_js))]
    pub async fn crawl(&self, urls: &[String], use_js: bool) -> Vec<PageOutcome> {
        let outcomes = join_all(urls.iter().map(|url| self.arun(url, use_js))).await;

        let failed = outcomes.iter().filter(|o| o.is_failure()).count();
        info!(
            total = outcomes.len(),
            succeeded = outcomes.len() - failed,
            failed,
            "Crawl finished"
        );
        outcomes
    }

    fn extractor_for(&self, url: &str) -> &dyn HeadlineExtractor {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .and_then(|host| self.host_extractors.get(&host))
            .unwrap_or(&self.extractor)
            .as_ref()
    }
}

#[derive(Default)]
pub struct CrawlerBuilder {
    verbose: bool,
    proxy: Option<String>,
    timeout: Option<Duration>,
    navigation_timeout: Option<Duration>,
    chrome_path: Option<PathBuf>,
    extractor: Option<Arc<dyn HeadlineExtractor>>,
    host_extractors: HashMap<String, Arc<dyn HeadlineExtractor>>,
}

impl CrawlerBuilder {
    /// Log per-URL fetch status at `info` instead of `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Route plain HTTP fetches through `proxy` (e.g. `http://host:3128`).
    /// Browser fetches do not use it.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Whole-request timeout for plain HTTP fetches.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// How long a browser fetch waits for navigation to finish.
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = Some(timeout);
        self
    }

    /// Chromium executable for browser fetches. Auto-detected when unset.
    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// Extractor used for every host without an override.
    pub fn extractor(mut self, extractor: impl HeadlineExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Extractor used only for pages served from `host`.
    pub fn host_extractor(
        mut self,
        host: impl Into<String>,
        extractor: impl HeadlineExtractor + 'static,
    ) -> Self {
        self.host_extractors
            .insert(host.into().to_ascii_lowercase(), Arc::new(extractor));
        self
    }

    /// Build the crawler and its HTTP client.
    ///
    /// # Errors
    ///
    /// Fails if the proxy URL is invalid or the HTTP client cannot be built.
    pub fn build(self) -> Result<Crawler> {
        let http = HttpFetcher::new(
            self.proxy.as_deref(),
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            self.verbose,
        )?;

        let mut browser = BrowserFetcher::new(self.verbose)
            .with_navigation_timeout(self.navigation_timeout.unwrap_or(DEFAULT_NAVIGATION_TIMEOUT));
        if let Some(path) = self.chrome_path {
            browser = browser.with_chrome_path(path);
        }

        Ok(Crawler {
            http,
            browser,
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::new(SelectorExtractor::tease_cards())),
            host_extractors: self.host_extractors,
            verbose: self.verbose,
        })
    }
}

//! JavaScript-rendering fetches through headless Chromium.
//!
//! Every call launches its own browser with a throwaway profile directory,
//! loads the page, captures the rendered DOM and shuts the browser down
//! again, whether or not navigation succeeded. Nothing is pooled.

use super::Fetcher;
use crate::error::{CrawlError, Result};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    navigation_timeout: Duration,
    chrome_path: Option<PathBuf>,
    profile_root: Option<PathBuf>,
    verbose: bool,
}

impl BrowserFetcher {
    pub fn new(verbose: bool) -> Self {
        Self {
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            chrome_path: None,
            profile_root: None,
            verbose,
        }
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Use a specific Chromium binary instead of auto-detection.
    pub fn with_chrome_path(mut self, path: PathBuf) -> Self {
        self.chrome_path = Some(path);
        self
    }

    /// Create throwaway profiles under `root` instead of the system temp dir.
    ///
    /// Each call still gets its own directory, removed once the browser has
    /// exited.
    pub fn with_profile_root(mut self, root: PathBuf) -> Self {
        self.profile_root = Some(root);
        self
    }

    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    fn config(&self, profile_dir: &Path) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .user_data_dir(profile_dir)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");

        if let Some(ref path) = self.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(CrawlError::Browser)
    }

    async fn render(&self, browser: &Browser, url: &str) -> Result<String> {
        let page = browser.new_page("about:blank").await?;

        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, CrawlError>(())
        };

        let result = match tokio::time::timeout(self.navigation_timeout, navigation).await {
            Ok(Ok(())) => capture(&page).await,
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CrawlError::NavigationTimeout {
                url: url.to_string(),
                timeout: self.navigation_timeout,
            }),
        };

        if let Err(e) = page.close().await {
            debug!(%url, error = %e, "Page close failed");
        }
        result
    }
}

async fn capture(page: &Page) -> Result<String> {
    Ok(page.content().await?)
}

impl Fetcher for BrowserFetcher {
    fn name(&self) -> &'static str {
        "browser"
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut profile = tempfile::Builder::new();
        profile.prefix("headline-crawler-profile-");
        let profile_dir = match self.profile_root {
            Some(ref root) => profile.tempdir_in(root)?,
            None => profile.tempdir()?,
        };
        let config = self.config(profile_dir.path())?;

        let (mut browser, mut handler) = Browser::launch(config).await?;
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let result = self.render(&browser, url).await;

        if let Err(e) = browser.close().await {
            debug!(%url, error = %e, "Browser close failed");
        }
        if let Err(e) = browser.wait().await {
            debug!(%url, error = %e, "Browser process did not exit cleanly");
        }
        events.abort();

        let html = result?;
        if self.verbose {
            info!(%url, bytes = html.len(), "Fetched page with JavaScript execution");
        } else {
            debug!(%url, bytes = html.len(), "Fetched page with JavaScript execution");
        }
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let fetcher = BrowserFetcher::new(true);
        assert_eq!(fetcher.navigation_timeout(), Duration::from_secs(60));
        assert!(fetcher.chrome_path.is_none());
        assert!(fetcher.profile_root.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let fetcher = BrowserFetcher::new(false)
            .with_navigation_timeout(Duration::from_secs(5))
            .with_chrome_path(PathBuf::from("/opt/chromium/chrome"))
            .with_profile_root(PathBuf::from("/var/tmp/profiles"));
        assert_eq!(fetcher.navigation_timeout(), Duration::from_secs(5));
        assert_eq!(fetcher.profile_root, Some(PathBuf::from("/var/tmp/profiles")));
        assert_eq!(fetcher.chrome_path, Some(PathBuf::from("/opt/chromium/chrome")));
    }

    #[tokio::test]
    async fn test_missing_browser_binary_is_reported() {
        let profiles = tempfile::tempdir().unwrap();
        let fetcher = BrowserFetcher::new(true)
            .with_chrome_path(PathBuf::from("/nonexistent/chromium-for-tests"))
            .with_profile_root(profiles.path().to_path_buf());

        assert!(fetcher.fetch("http://a.test").await.is_err());
        assert_eq!(std::fs::read_dir(profiles.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_navigation_timeout_tears_down_browser() {
        // Accepts the connection at the kernel level but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let profiles = tempfile::tempdir().unwrap();

        let fetcher = BrowserFetcher::new(true)
            .with_navigation_timeout(Duration::from_millis(200))
            .with_profile_root(profiles.path().to_path_buf());
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, CrawlError::NavigationTimeout { .. }));
        assert_eq!(std::fs::read_dir(profiles.path()).unwrap().count(), 0);
        drop(listener);
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_renders_script_generated_headlines() {
        let page = "data:text/html,<div id=n></div><script>\
            document.getElementById('n').innerHTML=\
            '<article class=\"tease-card\"><h2>Rendered</h2></article>';</script>";
        let html = BrowserFetcher::new(true).fetch(page).await.unwrap();
        let headlines = crate::extract::parse(&html, page).unwrap();
        assert_eq!(headlines, vec!["Rendered"]);
    }
}

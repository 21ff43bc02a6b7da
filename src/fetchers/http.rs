//! Plain HTTP fetching.
//!
//! A single `reqwest::Client` is built per fetcher and reused for every URL,
//! so connections are pooled across a batch. A proxy, when configured, is
//! applied to every request made by that client.
//!
//! `file://` URLs are read straight from disk, which makes it possible to
//! crawl saved pages without a web server.

use super::Fetcher;
use crate::error::{CrawlError, Result};
use reqwest::{Client, Proxy, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("headline_crawler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    verbose: bool,
}

impl HttpFetcher {
    /// Build a fetcher with its own client.
    ///
    /// # Errors
    ///
    /// Fails if the proxy URL is invalid or the TLS backend cannot be
    /// initialized.
    pub fn new(proxy: Option<&str>, timeout: Duration, verbose: bool) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(proxy) = proxy {
            debug!(%proxy, "Routing requests through proxy");
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            verbose,
        })
    }

    /// Whether per-URL status lines are logged at `info` rather than `debug`.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    async fn fetch_remote(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if self.verbose {
            info!(%url, status = status.as_u16(), "Fetched page");
        } else {
            debug!(%url, status = status.as_u16(), "Fetched page");
        }

        if status != StatusCode::OK {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    async fn fetch_file(&self, url: &Url) -> Result<String> {
        let path = url.to_file_path().map_err(|_| CrawlError::InvalidUrl {
            url: url.to_string(),
            reason: "not a local file path".to_string(),
        })?;
        let html = tokio::fs::read_to_string(&path).await?;

        if self.verbose {
            info!(%url, bytes = html.len(), "Read local page");
        } else {
            debug!(%url, bytes = html.len(), "Read local page");
        }
        Ok(html)
    }
}

impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| CrawlError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "file" => self.fetch_file(&parsed).await,
            "http" | "https" => self.fetch_remote(url).await,
            other => Err(CrawlError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme `{other}`"),
            }),
        }
    }
}

//! Headline extraction from fetched HTML.
//!
//! An extractor turns a page's markup into an ordered list of headline
//! strings. [`SelectorExtractor`] covers the common case of "one heading per
//! repeated container" and defaults to `article.tease-card` / `h2`. Anything
//! else can be plugged in by implementing [`HeadlineExtractor`], or by passing
//! a closure with the same signature.

use crate::error::{CrawlError, Result};
use crate::models::HeadlineList;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

pub const DEFAULT_CONTAINER: &str = "article.tease-card";
pub const DEFAULT_HEADING: &str = "h2";

static TEASE_CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse(DEFAULT_CONTAINER).expect("static container selector"));
static TEASE_HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse(DEFAULT_HEADING).expect("static heading selector"));

/// Strategy for pulling headlines out of a page.
///
/// `url` is the page the markup came from, for extractors that vary by
/// source.
pub trait HeadlineExtractor: Send + Sync {
    fn extract(&self, html: &str, url: &str) -> Result<HeadlineList>;
}

impl<F> HeadlineExtractor for F
where
    F: Fn(&str, &str) -> Result<HeadlineList> + Send + Sync,
{
    fn extract(&self, html: &str, url: &str) -> Result<HeadlineList> {
        self(html, url)
    }
}

/// Selects every `container` and takes the text of the first `heading`
/// inside each one.
#[derive(Debug, Clone)]
pub struct SelectorExtractor {
    container_css: String,
    heading_css: String,
    container: Selector,
    heading: Selector,
}

impl SelectorExtractor {
    /// Build an extractor from two CSS selectors.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Selector`] if either selector does not parse.
    pub fn new(container: &str, heading: &str) -> Result<Self> {
        Ok(Self {
            container_css: container.to_string(),
            heading_css: heading.to_string(),
            container: parse_selector(container)?,
            heading: parse_selector(heading)?,
        })
    }

    /// `article.tease-card` containers with an `h2` headline.
    pub fn tease_cards() -> Self {
        Self {
            container_css: DEFAULT_CONTAINER.to_string(),
            heading_css: DEFAULT_HEADING.to_string(),
            container: TEASE_CARD.clone(),
            heading: TEASE_HEADING.clone(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container_css
    }

    pub fn heading(&self) -> &str {
        &self.heading_css
    }
}

impl Default for SelectorExtractor {
    fn default() -> Self {
        Self::tease_cards()
    }
}

impl HeadlineExtractor for SelectorExtractor {
    #[instrument(level = "debug", skip_all, fields(%url, container = %self.container_css))]
    fn extract(&self, html: &str, url: &str) -> Result<HeadlineList> {
        let document = Html::parse_document(html);
        let mut headlines = Vec::new();

        for (index, card) in document.select(&self.container).enumerate() {
            let heading = card.select(&self.heading).next().ok_or_else(|| {
                CrawlError::MissingHeading {
                    container: self.container_css.clone(),
                    heading: self.heading_css.clone(),
                    index,
                }
            })?;
            headlines.push(visible_text(heading));
        }

        debug!(count = headlines.len(), "Extracted headlines");
        Ok(headlines)
    }
}

/// Extract headlines with the default tease-card pattern.
pub fn parse(html: &str, url: &str) -> Result<HeadlineList> {
    SelectorExtractor::tease_cards().extract(html, url)
}

/// Text content of an element, trimmed at both ends.
///
/// Inner whitespace is left exactly as the page has it.
pub fn visible_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CrawlError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

//! Data models for crawl results.
//!
//! - [`PageOutcome`]: what happened to a single URL
//! - [`CrawlReport`]: URL → headline list mapping written at the end of a run
//!
//! Everything here is transient; only the [`CrawlReport`] is ever written out.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Headlines extracted from one page, in document order.
pub type HeadlineList = Vec<String>;

/// Result of crawling a single URL.
///
/// The URL travels with its result so aggregation never has to rely on
/// the position of a future within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    /// The URL exactly as it was supplied.
    pub url: String,
    pub result: PageResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult {
    /// The page was fetched and parsed. The list may be empty.
    Headlines(HeadlineList),
    /// Fetching or parsing failed; the reason is kept for logging.
    Failed(String),
}

impl PageOutcome {
    /// A page that was fetched and parsed.
    pub fn headlines(url: impl Into<String>, headlines: HeadlineList) -> Self {
        Self {
            url: url.into(),
            result: PageResult::Headlines(headlines),
        }
    }

    /// A page that could not be fetched or parsed, with the reason.
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            result: PageResult::Failed(reason.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.result, PageResult::Failed(_))
    }

    /// Headlines for the report. Failures become an empty list.
    pub fn into_headlines(self) -> HeadlineList {
        match self.result {
            PageResult::Headlines(h) => h,
            PageResult::Failed(_) => Vec::new(),
        }
    }
}

/// Ordered mapping from URL to its headlines.
///
/// Keys are unique and keep the order in which they were first inserted.
/// Inserting an existing key replaces its value in place. Serializes as a
/// JSON object whose keys appear in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    entries: Vec<(String, HeadlineList)>,
    index: HashMap<String, usize>,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the headlines for `url`.
    ///
    /// A new URL is appended. A URL already present keeps its position and
    /// its headlines are replaced.
    pub fn insert(&mut self, url: impl Into<String>, headlines: HeadlineList) {
        let url = url.into();
        match self.index.get(&url) {
            Some(&i) => self.entries[i].1 = headlines,
            None => {
                self.index.insert(url.clone(), self.entries.len());
                self.entries.push((url, headlines));
            }
        }
    }

    /// Headlines recorded for `url`, if it was crawled.
    pub fn get(&self, url: &str) -> Option<&HeadlineList> {
        self.index.get(url).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(url, _)| url.as_str())
    }

    /// `(url, headlines)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeadlineList)> {
        self.entries.iter().map(|(url, h)| (url.as_str(), h))
    }

    /// Total number of headlines across all pages.
    pub fn headline_count(&self) -> usize {
        self.entries.iter().map(|(_, h)| h.len()).sum()
    }
}

impl FromIterator<PageOutcome> for CrawlReport {
    fn from_iter<I: IntoIterator<Item = PageOutcome>>(iter: I) -> Self {
        let mut report = CrawlReport::new();
        for outcome in iter {
            let url = outcome.url.clone();
            report.insert(url, outcome.into_headlines());
        }
        report
    }
}

impl Serialize for CrawlReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (url, headlines) in &self.entries {
            map.serialize_entry(url, headlines)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CrawlReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReportVisitor;

        impl<'de> Visitor<'de> for ReportVisitor {
            type Value = CrawlReport;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of URL to a list of headlines")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut report = CrawlReport::new();
                while let Some((url, headlines)) = access.next_entry::<String, HeadlineList>()? {
                    report.insert(url, headlines);
                }
                Ok(report)
            }
        }

        deserializer.deserialize_map(ReportVisitor)
    }
}

//! JSON output for crawl reports.
//!
//! The report is written as a single object, URL → array of headlines,
//! indented with four spaces. Existing files are overwritten.
//!
//! ```text
//! {
//!     "http://a.test": [
//!         "Headline 1",
//!         "Headline 2"
//!     ],
//!     "http://b.test": []
//! }
//! ```

use crate::error::Result;
use crate::models::CrawlReport;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Render a report as 4-space indented JSON.
pub fn to_pretty_json(report: &CrawlReport) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    report.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Write a [`CrawlReport`] to `path`, creating parent directories as needed.
///
/// # Arguments
///
/// * `report` - The report to serialize.
/// * `path` - Destination file. An existing file is replaced.
///
/// # Errors
///
/// Returns [`CrawlError::Io`](crate::error::CrawlError::Io) if the directory
/// or the file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &CrawlReport, path: &Path) -> Result<()> {
    let json = to_pretty_json(report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(urls = report.len(), "Wrote crawl report");
    Ok(())
}

/// Read a previously written report back.
pub async fn read_report(path: &Path) -> Result<CrawlReport> {
    let raw = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CrawlReport {
        let mut report = CrawlReport::new();
        report.insert(
            "http://a.test",
            vec!["Headline 1".to_string(), "Headline 2".to_string()],
        );
        report.insert("http://b.test", vec![]);
        report
    }

    #[test]
    fn test_four_space_indent() {
        let json = to_pretty_json(&sample()).unwrap();
        let expected = "{\n    \"http://a.test\": [\n        \"Headline 1\",\n        \"Headline 2\"\n    ],\n    \"http://b.test\": []\n}";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_non_ascii_headlines_are_kept() {
        let mut report = CrawlReport::new();
        report.insert("http://c.test", vec!["Café déjà vu — 東京".to_string()]);
        let json = to_pretty_json(&report).unwrap();
        assert!(json.contains("Café déjà vu — 東京"));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let mut report = CrawlReport::new();
        report.insert("http://d.test", vec!["Say \"hi\"\tnow\u{a0}\u{1F600}".to_string()]);
        let json = to_pretty_json(&report).unwrap();
        assert_eq!(
            json,
            "{\n    \"http://d.test\": [\n        \"Say \\\"hi\\\"\\tnow\u{a0}\u{1F600}\"\n    ]\n}"
        );
    }

    #[tokio::test]
    async fn test_write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");

        let report = sample();
        write_report(&report, &path).await.unwrap();
        let back = read_report(&path).await.unwrap();

        assert_eq!(back, report);
        assert_eq!(back.urls().collect::<Vec<_>>(), vec!["http://a.test", "http://b.test"]);
    }

    #[tokio::test]
    async fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        tokio::fs::write(&path, "stale content that is much longer than the new report")
            .await
            .unwrap();

        let mut report = CrawlReport::new();
        report.insert("http://only.test", vec![]);
        write_report(&report, &path).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(raw, "{\n    \"http://only.test\": []\n}");
    }

    #[tokio::test]
    async fn test_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/report.json");

        write_report(&sample(), &path).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go cannot be overwritten.
        let err = write_report(&sample(), dir.path()).await;
        assert!(err.is_err());
    }
}

//! Batch runs: crawl a list of URLs and save the report.

use crate::crawler::Crawler;
use crate::error::Result;
use crate::models::CrawlReport;
use crate::outputs::json;
use std::path::Path;
use tracing::{info, instrument};

pub const DEFAULT_OUTPUT_FILE: &str = "output.json";

/// Crawl every URL concurrently, build the report and write it to
/// `output_file`.
///
/// Every input URL ends up in the report exactly once; pages that failed
/// are recorded with an empty list. Only failures to write the report are
/// returned as errors.
#[instrument(level = "info", skip(crawler, urls), fields(count = urls.len()))]
pub async fn crawl_and_save(
    crawler: &Crawler,
    urls: &[String],
    output_file: &Path,
    use_js: bool,
) -> Result<CrawlReport> {
    let outcomes = crawler.crawl(urls, use_js).await;
    let failed = outcomes.iter().filter(|o| o.is_failure()).count();

    let report: CrawlReport = outcomes.into_iter().collect();
    json::write_report(&report, output_file).await?;

    info!(
        path = %output_file.display(),
        urls = report.len(),
        headlines = report.headline_count(),
        failed,
        "Successfully crawled data saved to {}",
        output_file.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_headlines_and_404_scenario() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                    <article class="tease-card"><h2>Headline 1</h2></article>
                    <article class="tease-card"><h2>Headline 2</h2></article>
                </body></html>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let a = format!("{}/a", server.uri());
        let b = format!("{}/b", server.uri());
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output.json");

        let crawler = Crawler::new(true).unwrap();
        crawl_and_save(&crawler, &[a.clone(), b.clone()], &output, false)
            .await
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let mut expected = serde_json::Map::new();
        expected.insert(a.clone(), serde_json::json!(["Headline 1", "Headline 2"]));
        expected.insert(b.clone(), serde_json::json!([]));
        assert_eq!(written, serde_json::Value::Object(expected));

        let raw = std::fs::read_to_string(&output).unwrap();
        assert!(raw.find(&a).unwrap() < raw.find(&b).unwrap());
    }

    #[tokio::test]
    async fn test_every_url_present_when_all_fail() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output.json");
        let urls = vec![
            "http://127.0.0.1:9/one".to_string(),
            "not even a url".to_string(),
            "file:///definitely/not/here.html".to_string(),
        ];

        let crawler = Crawler::new(false).unwrap();
        let report = crawl_and_save(&crawler, &urls, &output, false).await.unwrap();

        assert_eq!(report.urls().collect::<Vec<_>>(), urls.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(report.iter().all(|(_, h)| h.is_empty()));

        let back = json::read_report(&output).await.unwrap();
        assert_eq!(back, report);
    }

    #[tokio::test]
    async fn test_empty_url_list_writes_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output.json");

        let crawler = Crawler::new(false).unwrap();
        let report = crawl_and_save(&crawler, &[], &output, false).await.unwrap();

        assert!(report.is_empty());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let crawler = Crawler::new(false).unwrap();
        let result = crawl_and_save(&crawler, &[], dir.path(), false).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_local_file_crawl() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        std::fs::write(
            &page,
            r#"<div class="news-container">
                <article class="tease-card"><h2>Headline 1: Local News</h2></article>
                <article class="tease-card"><h2>Headline 2: Weather</h2></article>
            </div>"#,
        )
        .unwrap();
        let url = url::Url::from_file_path(&page).unwrap().to_string();
        let output = dir.path().join("crawled_headlines.json");

        let crawler = Crawler::new(true).unwrap();
        let report = crawl_and_save(&crawler, &[url.clone()], &output, false)
            .await
            .unwrap();

        assert_eq!(
            report.get(&url),
            Some(&vec![
                "Headline 1: Local News".to_string(),
                "Headline 2: Weather".to_string()
            ])
        );
    }
}

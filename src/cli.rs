//! Command-line interface definitions.
//!
//! Options that are usually fixed per environment (proxy, output path,
//! Chromium location) can also come from environment variables.

use clap::Parser;
use headline_crawler::batch::DEFAULT_OUTPUT_FILE;
use headline_crawler::extract::{DEFAULT_CONTAINER, DEFAULT_HEADING};
use std::path::PathBuf;

/// Fetch pages, extract their headlines and save them as JSON.
///
/// # Examples
///
/// ```sh
/// # Two sites, default output.json
/// headline_crawler https://a.example/news https://b.example/
///
/// # A saved page on disk, rendered with Chromium
/// headline_crawler --js -o crawled_headlines.json file:///tmp/index.html
///
/// # Different markup
/// headline_crawler --container "li.story" --heading h3 https://c.example/
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URLs to crawl (http, https or file)
    #[arg(required = true, num_args = 1..)]
    pub urls: Vec<String>,

    /// Path of the JSON report
    #[arg(short, long, env = "CRAWL_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Render pages in headless Chromium before extracting
    #[arg(long)]
    pub js: bool,

    /// Proxy for plain HTTP fetches
    #[arg(long, env = "CRAWL_PROXY")]
    pub proxy: Option<String>,

    /// Only log failures and the final summary
    #[arg(short, long)]
    pub quiet: bool,

    /// CSS selector for each headline container
    #[arg(long, default_value = DEFAULT_CONTAINER)]
    pub container: String,

    /// CSS selector for the headline inside a container
    #[arg(long, default_value = DEFAULT_HEADING)]
    pub heading: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Browser navigation timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub nav_timeout: u64,

    /// Chromium executable to use with --js
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,
}

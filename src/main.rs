//! # Headline Crawler
//!
//! Fetches a list of pages concurrently, pulls the headline out of every
//! teaser card on each page and writes a URL → headlines JSON report.
//!
//! ## Usage
//!
//! ```sh
//! headline_crawler -o crawled_headlines.json https://a.example/ file:///tmp/index.html
//! ```
//!
//! ## Pipeline
//!
//! 1. **Fetching**: plain HTTP (or headless Chromium with `--js`), all URLs at once
//! 2. **Parsing**: one CSS query per page, first heading of every container
//! 3. **Aggregating**: one report entry per input URL, failures as empty lists
//! 4. **Output**: indented JSON written to the requested path

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;
use headline_crawler::{Crawler, SelectorExtractor, batch};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_crawler starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let extractor = SelectorExtractor::new(&args.container, &args.heading)?;

    let mut builder = Crawler::builder()
        .verbose(!args.quiet)
        .timeout(Duration::from_secs(args.timeout))
        .navigation_timeout(Duration::from_secs(args.nav_timeout))
        .extractor(extractor);
    if let Some(ref proxy) = args.proxy {
        builder = builder.proxy(proxy.clone());
    }
    if let Some(ref path) = args.chrome_path {
        builder = builder.chrome_path(path.clone());
    }
    let crawler = builder.build()?;

    info!(urls = args.urls.len(), use_js = args.js, verbose = crawler.verbose(), "Crawling");
    if let Err(e) = batch::crawl_and_save(&crawler, &args.urls, &args.output, args.js).await {
        error!(path = %args.output.display(), error = %e, "Failed to save crawl report");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

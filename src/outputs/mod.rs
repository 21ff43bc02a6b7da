//! Output writers for crawl results.
//!
//! - [`json`]: the URL → headlines report consumed by downstream tools

pub mod json;

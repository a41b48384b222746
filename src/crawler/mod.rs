//! Crawler module for fetching and archiving a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML link extraction behind the `LinkExtractor` trait
//! - The breadth-first frontier
//! - The site archiver loop and its category-scoped variant

mod archiver;
mod categories;
mod fetcher;
mod frontier;
mod parser;

pub use archiver::{CrawlReport, SiteArchiver, DEFAULT_REQUEST_DELAY};
pub use categories::{categories_from_links, discover_categories, CategoryCrawl, CategoryReport};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::{extract_links, HtmlLinkExtractor, LinkExtractor};

use crate::config::Config;
use crate::store::ArchiveStore;
use crate::Result;
use std::time::Duration;

/// The archiver used by the binary: reqwest fetching, scraper link extraction
pub type HttpArchiver = SiteArchiver<HttpFetcher, HtmlLinkExtractor>;

/// Builds the default archiver from configuration
///
/// # Arguments
///
/// * `config` - The archive configuration
/// * `store` - The store pages and PDFs are written to
///
/// # Returns
///
/// * `Ok(HttpArchiver)` - Ready to run
/// * `Err(KeteError)` - The HTTP client could not be built
pub fn build_archiver(config: &Config, store: ArchiveStore) -> Result<HttpArchiver> {
    let fetcher = HttpFetcher::from_config(config)?;
    Ok(SiteArchiver::new(fetcher, HtmlLinkExtractor, store)
        .with_delay(Duration::from_millis(config.crawler.request_delay_ms)))
}

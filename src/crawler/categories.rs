//! Category-scoped crawling
//!
//! The MAP manual is organised into categories linked from a navigation
//! page. A category crawl discovers those start pages and runs one archiver
//! pass per category, each confined to the category's directory.

use crate::crawler::archiver::{CrawlReport, SiteArchiver};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::parser::{extract_links, LinkExtractor};
use crate::url::{directory_prefix, CrawlTarget, ScopeRule};
use crate::{KeteError, Result};
use std::collections::BTreeMap;

/// Deepest category start page, in segments below the navigation directory
const MAX_CATEGORY_DEPTH: usize = 2;

/// Finds category start pages linked from a navigation page
///
/// Keeps links on the navigation page's domain whose path lies under its
/// directory and at most two segments below it, excluding the navigation
/// page itself. Query strings and fragments are removed; the result is
/// deduplicated and sorted by URL.
///
/// # Example
///
/// ```
/// use kete::crawler::discover_categories;
/// use kete::CrawlTarget;
///
/// let nav = CrawlTarget::parse("https://site.test/map/index.html").unwrap();
/// let body = r#"<a href="/map/deskfile/index.html">Deskfile</a>
///               <a href="/map/a/b/c.html">Too deep</a>"#;
///
/// let found = discover_categories(body, &nav);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].path(), "/map/deskfile/index.html");
/// ```
pub fn discover_categories(body: &str, nav: &CrawlTarget) -> Vec<CrawlTarget> {
    categories_from_links(extract_links(body, nav.url()), nav)
}

/// Applies the category rules to already-extracted links
pub fn categories_from_links(
    links: impl IntoIterator<Item = String>,
    nav: &CrawlTarget,
) -> Vec<CrawlTarget> {
    let nav_dir = directory_prefix(nav.path());
    let mut found = BTreeMap::new();

    for link in links {
        let mut target = match CrawlTarget::parse(&link) {
            Ok(target) => target,
            Err(_) => continue,
        };

        if target.query().is_some() {
            target = target.without_query();
        }

        if target.domain() != nav.domain() || target.path() == nav.path() {
            continue;
        }

        let Some(rest) = target.path().strip_prefix(nav_dir.as_str()) else {
            continue;
        };

        let depth = rest
            .trim_end_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .count();
        if depth == 0 || depth > MAX_CATEGORY_DEPTH {
            continue;
        }

        found.insert(target.as_str().to_string(), target);
    }

    found.into_values().collect()
}

/// Result of a category crawl
#[derive(Debug, Clone, Default)]
pub struct CategoryReport {
    /// Category start URLs in crawl order
    pub categories: Vec<String>,

    /// Combined report of every category pass
    pub crawl: CrawlReport,
}

/// One category crawl driven by a navigation page
pub struct CategoryCrawl<'a, F, L> {
    archiver: &'a SiteArchiver<F, L>,
    nav: CrawlTarget,
}

impl<'a, F: Fetcher, L: LinkExtractor> CategoryCrawl<'a, F, L> {
    pub fn new(archiver: &'a SiteArchiver<F, L>, nav: CrawlTarget) -> Self {
        Self { archiver, nav }
    }

    /// Fetches the navigation page and lists its categories
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<CrawlTarget>)` - Sorted category start pages
    /// * `Err(KeteError::Navigation)` - The navigation page could not be fetched
    pub async fn discover(&self) -> Result<Vec<CrawlTarget>> {
        tracing::info!("Fetching navigation page {}", self.nav);
        let result = self.archiver.fetcher().fetch(self.nav.url()).await;
        self.archiver.pause().await;

        let body = match result {
            FetchResult::Success { body, .. } => body,
            FetchResult::HttpError { status_code } => {
                return Err(KeteError::Navigation {
                    url: self.nav.to_string(),
                    reason: format!("HTTP {}", status_code),
                });
            }
            FetchResult::NetworkError { error } => {
                return Err(KeteError::Navigation {
                    url: self.nav.to_string(),
                    reason: error,
                });
            }
        };

        let html = String::from_utf8_lossy(&body);
        let links = self
            .archiver
            .link_extractor()
            .extract_links(&html, self.nav.url());
        let categories = categories_from_links(links, &self.nav);

        tracing::info!("Found {} categories", categories.len());
        Ok(categories)
    }

    /// Crawls every discovered category with its own visited-set
    ///
    /// Pages shared between categories are fetched once per category. The
    /// caller records the category timestamp after this returns.
    pub async fn run(&self) -> Result<CategoryReport> {
        let categories = self.discover().await?;
        let mut report = CategoryReport::default();

        for (index, category) in categories.into_iter().enumerate() {
            let scope = ScopeRule::category(&category);
            tracing::info!(
                "Crawling category {} ({}): scope {:?}",
                index + 1,
                category,
                scope
            );

            report.categories.push(category.as_str().to_string());
            let pass = self.archiver.run(category, &scope).await?;
            report.crawl.absorb(pass);
        }

        tracing::info!(
            "Category crawl complete: {} categories, {} pages visited",
            report.categories.len(),
            report.crawl.visited
        );

        Ok(report)
    }
}

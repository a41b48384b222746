//! Site archiver - the breadth-first crawl loop
//!
//! Drains a [`Frontier`] one target at a time: fetch, classify as PDF or
//! HTML, persist through the [`ArchiveStore`], and (for HTML) feed in-scope
//! links back into the frontier. Fetch failures are logged and counted;
//! filesystem failures end the run.

use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::LinkExtractor;
use crate::store::{ArchiveStore, PdfWrite};
use crate::url::{CrawlTarget, ScopeRule};
use crate::Result;
use std::time::Duration;

/// Pause after each request when none is configured
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(300);

/// Summary of one archiver run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Targets dequeued and fetched
    pub visited: usize,

    /// HTML pages written
    pub html_saved: usize,

    /// PDFs newly written
    pub pdfs_saved: usize,

    /// PDFs whose file already existed
    pub pdfs_skipped: usize,

    /// Fetches that ended in a network error or non-200 status
    pub failures: usize,

    /// Visited URLs in crawl order
    pub visited_urls: Vec<String>,
}

impl CrawlReport {
    /// Adds the counts and visit log of `other` to this report
    pub fn absorb(&mut self, other: CrawlReport) {
        self.visited += other.visited;
        self.html_saved += other.html_saved;
        self.pdfs_saved += other.pdfs_saved;
        self.pdfs_skipped += other.pdfs_skipped;
        self.failures += other.failures;
        self.visited_urls.extend(other.visited_urls);
    }
}

/// Breadth-first archiver over a fetcher and a link extractor
#[derive(Debug, Clone)]
pub struct SiteArchiver<F, L> {
    fetcher: F,
    links: L,
    store: ArchiveStore,
    delay: Duration,
}

impl<F: Fetcher, L: LinkExtractor> SiteArchiver<F, L> {
    pub fn new(fetcher: F, links: L, store: ArchiveStore) -> Self {
        Self {
            fetcher,
            links,
            store,
            delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// Sets the pause taken after every request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn store(&self) -> &ArchiveStore {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn link_extractor(&self) -> &L {
        &self.links
    }

    /// Archives everything reachable from `start` within `scope`
    ///
    /// The visited-set lives only for this call, so two runs never share
    /// state. Recording the last-run timestamp is left to the caller.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Frontier drained
    /// * `Err(KeteError)` - A file could not be written
    pub async fn run(&self, start: CrawlTarget, scope: &ScopeRule) -> Result<CrawlReport> {
        tracing::info!("Starting crawl at {}", start);

        let mut frontier = Frontier::seeded(start);
        let mut report = CrawlReport::default();

        while let Some(target) = frontier.dequeue() {
            if !frontier.mark_visited(&target) {
                continue;
            }

            report.visited += 1;
            report.visited_urls.push(target.as_str().to_string());
            tracing::debug!("Processing URL: {}", target);

            match self.fetcher.fetch(target.url()).await {
                FetchResult::Success {
                    content_type, body, ..
                } => {
                    self.archive(&target, &content_type, &body, scope, &mut frontier, &mut report)?;
                }
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("Failed to fetch {}: HTTP {}", target, status_code);
                    report.failures += 1;
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!("Failed to fetch {}: {}", target, error);
                    report.failures += 1;
                }
            }

            self.pause().await;
        }

        tracing::info!(
            "Crawl complete: {} visited, {} pages, {} new PDFs ({} already present), {} failures",
            report.visited,
            report.html_saved,
            report.pdfs_saved,
            report.pdfs_skipped,
            report.failures
        );

        Ok(report)
    }

    /// Sleeps for the configured request delay
    pub(crate) async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn archive(
        &self,
        target: &CrawlTarget,
        content_type: &str,
        body: &[u8],
        scope: &ScopeRule,
        frontier: &mut Frontier,
        report: &mut CrawlReport,
    ) -> Result<()> {
        if is_pdf(target, content_type) {
            match self.store.write_pdf_if_absent(target, body)? {
                PdfWrite::Written(path) => {
                    tracing::info!("Saved PDF: {}", path.display());
                    report.pdfs_saved += 1;
                }
                PdfWrite::AlreadyPresent(path) => {
                    tracing::debug!("PDF already archived: {}", path.display());
                    report.pdfs_skipped += 1;
                }
            }
            return Ok(());
        }

        let path = self.store.write_html(target, body)?;
        tracing::info!("Saved page: {}", path.display());
        report.html_saved += 1;

        let html = String::from_utf8_lossy(body);
        for link in self.links.extract_links(&html, target.url()) {
            let candidate = match CrawlTarget::parse(&link) {
                Ok(candidate) => candidate,
                Err(e) => {
                    tracing::debug!("Skipping link {}: {}", link, e);
                    continue;
                }
            };

            if !scope.accepts(&candidate) {
                tracing::debug!("Out of scope: {}", candidate);
                continue;
            }

            frontier.enqueue(candidate);
        }

        Ok(())
    }
}

/// PDF if the server says so or the URL path ends in `.pdf`
fn is_pdf(target: &CrawlTarget, content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/pdf") || target.has_pdf_suffix()
}

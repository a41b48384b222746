//! Staleness-gated archive updates
//!
//! The `Updater` ties the pieces together: it asks the last-run timestamp
//! whether a refresh is due, runs the archiver, records the timestamp, and
//! finishes with the extraction post-pass. Periodic mode and background
//! offload are built on top of `run_update`.

mod periodic;

pub use periodic::{run_periodic, sleep_after};

use crate::config::Config;
use crate::crawler::{
    build_archiver, CategoryCrawl, CrawlReport, Fetcher, HtmlLinkExtractor, HttpFetcher,
    LinkExtractor, SiteArchiver,
};
use crate::extract::{extract_pending, DocumentTextExtractor, ExtractionReport, TextExtractor};
use crate::state::{LastRun, RunKind};
use crate::store::ArchiveStore;
use crate::url::{CrawlTarget, ScopeRule};
use crate::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What an update call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A crawl and extraction pass ran and the timestamp was recorded
    Updated {
        kind: RunKind,
        /// Category start URLs (empty for a full-site run)
        categories: Vec<String>,
        crawl: CrawlReport,
        extraction: ExtractionReport,
        /// Unix seconds written to the timestamp file
        recorded_at: i64,
    },

    /// The archive was younger than the configured maximum age
    AlreadyCurrent,
}

/// Runs archive updates for one configuration
pub struct Updater<F, L, E> {
    config: Config,
    archiver: SiteArchiver<F, L>,
    extractor: E,
}

/// The updater used by the binary
pub type HttpUpdater = Updater<HttpFetcher, HtmlLinkExtractor, DocumentTextExtractor>;

impl HttpUpdater {
    /// Opens the archive store and builds the default collaborators
    pub fn from_config(config: Config) -> Result<Self> {
        let store = ArchiveStore::open(&config.archive.output_dir)?;
        let archiver = build_archiver(&config, store)?;
        Ok(Self::new(config, archiver, DocumentTextExtractor::new()))
    }
}

impl<F: Fetcher, L: LinkExtractor, E: TextExtractor> Updater<F, L, E> {
    pub fn new(config: Config, archiver: SiteArchiver<F, L>, extractor: E) -> Self {
        Self {
            config,
            archiver,
            extractor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ArchiveStore {
        self.archiver.store()
    }

    /// Timestamp handle for `kind` in this archive
    pub fn last_run(&self, kind: RunKind) -> LastRun {
        LastRun::for_kind(self.store().root(), kind)
    }

    /// Whether the full-site archive is older than `max-age-days`
    pub fn needs_update(&self) -> bool {
        self.last_run(RunKind::FullSite)
            .needs_update(self.config.crawler.max_age_days)
    }

    /// Runs the full-site archive if forced or stale
    ///
    /// # Arguments
    ///
    /// * `force` - Skip the staleness check
    ///
    /// # Returns
    ///
    /// * `Ok(UpdateOutcome::Updated { .. })` - Crawl, timestamp and extraction done
    /// * `Ok(UpdateOutcome::AlreadyCurrent)` - Nothing to do
    /// * `Err(KeteError)` - The crawl or a file write failed; no timestamp written
    pub async fn run_update(&self, force: bool) -> Result<UpdateOutcome> {
        if !force && !self.needs_update() {
            tracing::info!("Data is already current");
            return Ok(UpdateOutcome::AlreadyCurrent);
        }

        tracing::info!("Data needs to be updated");
        let start = CrawlTarget::parse(&self.config.archive.start_url)?;
        let scope = ScopeRule::same_domain(&start);

        let crawl = self.archiver.run(start, &scope).await?;
        let recorded_at = self.last_run(RunKind::FullSite).record_now()?;
        let extraction = extract_pending(self.store(), &self.extractor)?;

        tracing::info!("Update complete");
        Ok(UpdateOutcome::Updated {
            kind: RunKind::FullSite,
            categories: Vec::new(),
            crawl,
            extraction,
            recorded_at,
        })
    }

    /// Whether the category archive is older than `max-age-days`
    pub fn needs_category_update(&self) -> bool {
        self.last_run(RunKind::Category)
            .needs_update(self.config.crawler.max_age_days)
    }

    /// Runs the category crawl if forced or stale
    ///
    /// Gated on the category timestamp, which is separate from the
    /// full-site one.
    pub async fn run_category_update(&self, force: bool) -> Result<UpdateOutcome> {
        if !force && !self.needs_category_update() {
            tracing::info!("Category data is already current");
            return Ok(UpdateOutcome::AlreadyCurrent);
        }

        self.run_categories().await
    }

    /// Runs the category crawl unconditionally
    ///
    /// The start URL is treated as the navigation page. The category
    /// timestamp is written only after every category has been crawled.
    pub async fn run_categories(&self) -> Result<UpdateOutcome> {
        let nav = CrawlTarget::parse(&self.config.archive.start_url)?;
        let report = CategoryCrawl::new(&self.archiver, nav).run().await?;

        let extraction = extract_pending(self.store(), &self.extractor)?;
        let recorded_at = self.last_run(RunKind::Category).record_now()?;

        Ok(UpdateOutcome::Updated {
            kind: RunKind::Category,
            categories: report.categories,
            crawl: report.crawl,
            extraction,
            recorded_at,
        })
    }

    /// Runs the extraction post-pass on its own
    pub fn extract_pending(&self) -> Result<ExtractionReport> {
        Ok(extract_pending(self.store(), &self.extractor)?)
    }
}

/// Runs `run_update(force)` on a tokio task
///
/// The caller keeps serving while the archive refreshes and can await the
/// handle for the outcome.
pub fn spawn_update<F, L, E>(
    updater: Arc<Updater<F, L, E>>,
    force: bool,
) -> JoinHandle<Result<UpdateOutcome>>
where
    F: Fetcher + 'static,
    L: LinkExtractor + 'static,
    E: TextExtractor + 'static,
{
    tokio::spawn(async move { updater.run_update(force).await })
}

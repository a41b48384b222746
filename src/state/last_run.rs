//! Last-run timestamp persistence and the staleness decision
//!
//! The timestamp is a single decimal unix-seconds integer in a flat file at
//! the archive root. It is written only after a complete pass, so an
//! interrupted crawl leaves the previous value (or none) in place and the
//! archive keeps reading as stale.

use crate::store::{StoreError, StoreResult};
use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};

/// Timestamp file of the full-site crawl
pub const FULL_SITE_TIMESTAMP: &str = "last_scrape.txt";

/// Timestamp file of the category crawl
pub const CATEGORY_TIMESTAMP: &str = "last_nav_scrape.txt";

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Which crawler a timestamp belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    /// Whole-site crawl from the start URL
    FullSite,

    /// Per-category crawl driven by the navigation page
    Category,
}

impl RunKind {
    /// Name of the timestamp file for this kind of run
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::FullSite => FULL_SITE_TIMESTAMP,
            Self::Category => CATEGORY_TIMESTAMP,
        }
    }

    /// Human readable label for status output
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullSite => "full-site",
            Self::Category => "category",
        }
    }
}

/// Handle on one persisted last-run timestamp
#[derive(Debug, Clone)]
pub struct LastRun {
    path: PathBuf,
}

impl LastRun {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The timestamp file of `kind` under the archive root
    pub fn for_kind(root: &Path, kind: RunKind) -> Self {
        Self::new(root.join(kind.file_name()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored unix timestamp
    ///
    /// A missing, unreadable or malformed file yields `None`.
    pub fn read(&self) -> Option<i64> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match content.trim().parse::<i64>() {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed timestamp in {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Reads the stored timestamp as a UTC date-time
    pub fn read_datetime(&self) -> Option<DateTime<Utc>> {
        self.read()
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    /// Persists `at` as the last successful run
    pub fn record(&self, at: DateTime<Utc>) -> StoreResult<()> {
        std::fs::write(&self.path, at.timestamp().to_string()).map_err(|source| {
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Persists the current wall-clock time and returns it
    pub fn record_now(&self) -> StoreResult<i64> {
        let now = Utc::now();
        self.record(now)?;
        Ok(now.timestamp())
    }

    /// Returns true if the archive is older than `max_age_days` or has no
    /// usable timestamp
    pub fn needs_update(&self, max_age_days: u64) -> bool {
        self.needs_update_at(max_age_days, Utc::now())
    }

    /// Same as [`needs_update`](Self::needs_update) against an explicit clock
    pub fn needs_update_at(&self, max_age_days: u64, now: DateTime<Utc>) -> bool {
        is_stale(self.read(), max_age_days, now.timestamp())
    }
}

/// The staleness rule: no history is always stale, otherwise stale iff the
/// age strictly exceeds `max_age_days` whole days
pub fn is_stale(last_run: Option<i64>, max_age_days: u64, now: i64) -> bool {
    match last_run {
        None => true,
        Some(last) => {
            let max_age = i64::try_from(max_age_days)
                .unwrap_or(i64::MAX)
                .saturating_mul(SECONDS_PER_DAY);
            now.saturating_sub(last) > max_age
        }
    }
}

//! State module for tracking archive freshness
//!
//! # Components
//!
//! - `LastRun`: reads and writes the per-crawler last-run timestamp file
//! - `RunKind`: distinguishes the full-site and category timestamps
//! - `is_stale`: the staleness rule applied to a timestamp

mod last_run;

// Re-export main types
pub use last_run::{is_stale, LastRun, RunKind, CATEGORY_TIMESTAMP, FULL_SITE_TIMESTAMP};

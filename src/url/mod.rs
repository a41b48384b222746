//! URL handling module for Kete
//!
//! This module provides crawl targets (fragment-free http/https URLs),
//! network-location extraction, and the scope rules that decide which
//! discovered links a crawl may follow.

mod domain;
mod scope;
mod target;

// Re-export main types
pub use domain::extract_domain;
pub use scope::{directory_prefix, ScopeRule};
pub use target::CrawlTarget;

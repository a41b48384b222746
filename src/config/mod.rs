//! Configuration module for Kete
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so the archiver also runs with `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use kete::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kete.toml")).unwrap();
//! println!("Stale after {} days", config.crawler.max_age_days);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ArchiveConfig, Config, CrawlerConfig, UserAgentConfig, DEFAULT_START_URL};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;

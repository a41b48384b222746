//! Archive store module
//!
//! This module owns the on-disk layout of the archive:
//! - Mapping URLs to local paths for HTML pages, PDFs and extracted text
//! - Writing pages (always overwritten) and PDFs (create-if-absent)
//! - Enumerating stored PDFs for the extraction pass

mod archive;
mod paths;

pub use archive::{ArchiveStore, PdfWrite, HTML_DIR, PDF_DIR, TEXT_DIR};
pub use paths::{html_relative_path, pdf_file_name, sanitize_pdf_filename, text_relative_path};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the archive
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk archive: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Path is outside the archive: {}", .0.display())]
    OutsideArchive(PathBuf),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

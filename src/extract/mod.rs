//! Text extraction from archived documents
//!
//! This module handles:
//! - The `TextExtractor` boundary, which cannot fail by construction
//! - A document backend: `pdftotext`, then `pdf-extract`, then OCR
//! - Bounded execution of the external tools
//! - The incremental post-pass that fills `pdf_text/` after a crawl

mod command;
mod document;
mod ocr;
mod pass;

pub use document::DocumentTextExtractor;
pub use ocr::OcrEngine;
pub use pass::{extract_pending, ExtractionReport};

use std::fmt;
use std::path::Path;

/// Text produced by a [`TextExtractor`]
///
/// Empty text is the "nothing usable" outcome: unsupported formats, missing
/// backends and corrupt files all end up here instead of in an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The "no usable text" result
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts text from a file on disk
///
/// Implementations never fail: every problem is reported through logging
/// and an empty [`ExtractedText`].
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> ExtractedText;
}

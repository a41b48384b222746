//! Text extraction from PDFs and scanned images
//!
//! PDFs go through the Poppler `pdftotext` tool when it is installed, then
//! the pure-Rust `pdf-extract` crate, then OCR. Images go straight to OCR.

use crate::extract::command::{run_with_timeout, TOOL_TIMEOUT};
use crate::extract::ocr::OcrEngine;
use crate::extract::{ExtractedText, TextExtractor};
use std::panic;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Image extensions handed to OCR
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "tif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Pdf,
    Image,
    Unsupported,
}

fn file_kind(path: &Path) -> FileKind {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return FileKind::Unsupported;
    };
    let ext = ext.to_ascii_lowercase();

    if ext == "pdf" {
        FileKind::Pdf
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        FileKind::Image
    } else {
        FileKind::Unsupported
    }
}

/// Extractor for PDFs and images with external and in-process backends
#[derive(Debug, Clone, Default)]
pub struct DocumentTextExtractor {
    pdftotext: Option<PathBuf>,
    ocr: OcrEngine,
}

impl DocumentTextExtractor {
    /// Looks up `pdftotext`, `tesseract` and `pdftoppm` on `PATH`
    ///
    /// Any tool that is missing is simply skipped.
    pub fn new() -> Self {
        let pdftotext = which::which("pdftotext").ok();
        match &pdftotext {
            Some(bin) => tracing::debug!("Using pdftotext at {}", bin.display()),
            None => tracing::debug!("pdftotext not found, using in-process extraction only"),
        }
        Self::with_tools(pdftotext, OcrEngine::detect())
    }

    /// Extractor that never shells out
    pub fn in_process_only() -> Self {
        Self::default()
    }

    pub fn with_tools(pdftotext: Option<PathBuf>, ocr: OcrEngine) -> Self {
        Self { pdftotext, ocr }
    }

    fn run_pdftotext(bin: &Path, pdf: &Path) -> Option<String> {
        let mut command = Command::new(bin);
        command
            .args(["-layout", "-enc", "UTF-8", "-nopgbrk"])
            .arg(pdf)
            .arg("-");

        run_with_timeout(command, TOOL_TIMEOUT)
            .map(|out| String::from_utf8_lossy(&out).into_owned())
    }

    fn run_pdf_extract(pdf: &Path) -> Option<String> {
        let bytes = match std::fs::read(pdf) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", pdf.display(), e);
                return None;
            }
        };

        // pdf-extract panics on some malformed inputs
        match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes)) {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                tracing::warn!("pdf-extract failed on {}: {}", pdf.display(), e);
                None
            }
            Err(_) => {
                tracing::warn!("pdf-extract panicked on {}", pdf.display());
                None
            }
        }
    }

    fn pdf_text(&self, path: &Path) -> Option<String> {
        if let Some(bin) = &self.pdftotext {
            if let Some(text) = Self::run_pdftotext(bin, path).filter(|t| has_words(t)) {
                return Some(text);
            }
        }

        if let Some(text) = Self::run_pdf_extract(path).filter(|t| has_words(t)) {
            return Some(text);
        }

        if self.ocr.can_read_pdfs() {
            tracing::info!("No embedded text in {}, trying OCR", path.display());
            return self.ocr.pdf_text(path).filter(|t| has_words(t));
        }

        None
    }
}

fn has_words(text: &str) -> bool {
    !text.trim().is_empty()
}

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, path: &Path) -> ExtractedText {
        let text = match file_kind(path) {
            FileKind::Pdf => self.pdf_text(path),
            FileKind::Image => {
                if !self.ocr.can_read_images() {
                    tracing::warn!("tesseract is not installed, cannot read {}", path.display());
                    return ExtractedText::empty();
                }
                self.ocr.image_text(path).filter(|t| has_words(t))
            }
            FileKind::Unsupported => {
                tracing::warn!("Unsupported file format for extraction: {}", path.display());
                return ExtractedText::empty();
            }
        };

        match text {
            Some(text) => ExtractedText::new(text),
            None => {
                tracing::warn!("Unable to extract text from {}", path.display());
                ExtractedText::empty()
            }
        }
    }
}

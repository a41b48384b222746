//! OCR through the `tesseract` command-line tool
//!
//! Images are passed to tesseract directly. Scanned PDFs are first
//! rasterised page by page with Poppler's `pdftoppm` into a scratch
//! directory, then each page image is recognised in order.

use crate::extract::command::{run_with_timeout, TOOL_TIMEOUT};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Rendering resolution for PDF pages
const PAGE_DPI: &str = "300";

/// Tesseract and pdftoppm locations, either of which may be missing
#[derive(Debug, Clone)]
pub struct OcrEngine {
    tesseract: Option<PathBuf>,
    pdftoppm: Option<PathBuf>,
}

impl Default for OcrEngine {
    fn default() -> Self {
        Self::with_tools(None, None)
    }
}

impl OcrEngine {
    /// Looks both tools up on `PATH`
    pub fn detect() -> Self {
        let tesseract = which::which("tesseract").ok();
        let pdftoppm = which::which("pdftoppm").ok();
        if tesseract.is_none() {
            tracing::debug!("tesseract not found, OCR disabled");
        }
        Self::with_tools(tesseract, pdftoppm)
    }

    pub fn with_tools(tesseract: Option<PathBuf>, pdftoppm: Option<PathBuf>) -> Self {
        Self {
            tesseract,
            pdftoppm,
        }
    }

    /// True when images can be recognised
    pub fn can_read_images(&self) -> bool {
        self.tesseract.is_some()
    }

    /// True when scanned PDFs can be recognised
    pub fn can_read_pdfs(&self) -> bool {
        self.tesseract.is_some() && self.pdftoppm.is_some()
    }

    /// Recognises the text of one image file
    pub fn image_text(&self, image: &Path) -> Option<String> {
        let tesseract = self.tesseract.as_ref()?;

        let mut command = Command::new(tesseract);
        command.arg(image).arg("stdout");
        let out = run_with_timeout(command, TOOL_TIMEOUT)?;

        Some(String::from_utf8_lossy(&out).into_owned())
    }

    /// Rasterises every page of `pdf` and recognises each in page order
    pub fn pdf_text(&self, pdf: &Path) -> Option<String> {
        let pdftoppm = self.pdftoppm.as_ref()?;
        if !self.can_read_images() {
            return None;
        }

        let scratch = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!("Could not create OCR scratch directory: {}", e);
                return None;
            }
        };

        let mut command = Command::new(pdftoppm);
        command
            .args(["-r", PAGE_DPI, "-png"])
            .arg(pdf)
            .arg(scratch.path().join("page"));
        run_with_timeout(command, TOOL_TIMEOUT)?;

        // pdftoppm zero-pads page numbers, so name order is page order
        let pages: Vec<PathBuf> = WalkDir::new(scratch.path())
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();

        tracing::debug!("OCR on {} pages of {}", pages.len(), pdf.display());
        let text: Vec<String> = pages
            .iter()
            .filter_map(|page| self.image_text(page))
            .collect();

        Some(text.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_tools_reads_nothing() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("letter.png");
        std::fs::write(&image, b"not really a png").unwrap();

        let engine = OcrEngine::default();
        assert!(!engine.can_read_images());
        assert!(engine.image_text(&image).is_none());
        assert!(engine.pdf_text(&image).is_none());
    }

    #[test]
    fn test_missing_binaries_read_nothing() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("scan.pdf");
        std::fs::write(&pdf, b"%PDF-fake").unwrap();

        let engine = OcrEngine::with_tools(
            Some(PathBuf::from("/nonexistent/tesseract")),
            Some(PathBuf::from("/nonexistent/pdftoppm")),
        );
        assert!(engine.can_read_pdfs());
        assert!(engine.image_text(&pdf).is_none());
        assert!(engine.pdf_text(&pdf).is_none());
    }

    #[test]
    fn test_image_passed_to_tesseract() {
        // echo stands in for tesseract and prints its arguments back
        let Ok(echo) = which::which("echo") else {
            return;
        };
        let engine = OcrEngine::with_tools(Some(echo), None);

        let text = engine.image_text(Path::new("/scans/letter.png")).unwrap();
        assert_eq!(text.trim(), "/scans/letter.png stdout");
    }
}

use crate::extract::TextExtractor;
use crate::store::{ArchiveStore, StoreResult};

/// Counts from one extraction post-pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// PDFs passed to the extractor
    pub extracted: usize,

    /// PDFs that already had non-empty text
    pub skipped: usize,

    /// Extractions that produced no text (an empty file was still written)
    pub empty: usize,
}

/// Extracts text for every archived PDF that does not have any yet
///
/// Walks `pdfs/` recursively. A PDF whose mirrored `.txt` exists and is
/// non-empty is skipped; missing or zero-length text files are (re)written
/// with whatever the extractor returns, including an empty string. Running
/// the pass again therefore only costs work for new or previously failed
/// PDFs.
pub fn extract_pending(
    store: &ArchiveStore,
    extractor: &dyn TextExtractor,
) -> StoreResult<ExtractionReport> {
    tracing::info!("Extracting text from downloaded PDFs...");
    let mut report = ExtractionReport::default();

    for pdf_path in store.list_pdfs()? {
        let text_path = store.text_path_for(&pdf_path)?;

        if store.has_text(&text_path) {
            report.skipped += 1;
            continue;
        }

        tracing::info!("Extracting {}", pdf_path.display());
        let text = extractor.extract(&pdf_path);
        if text.is_empty() {
            report.empty += 1;
        }

        store.write_text(&text_path, text.as_str())?;
        report.extracted += 1;
    }

    tracing::info!(
        "PDF text extraction complete: {} extracted ({} empty), {} already done. Results under {}",
        report.extracted,
        report.empty,
        report.skipped,
        store.text_root().display()
    );

    Ok(report)
}

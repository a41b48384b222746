//! Filesystem-backed archive store

use crate::store::paths::{html_relative_path, pdf_file_name, text_relative_path};
use crate::store::{StoreError, StoreResult};
use crate::url::CrawlTarget;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Subdirectory holding mirrored HTML pages
pub const HTML_DIR: &str = "html";

/// Subdirectory holding downloaded PDFs
pub const PDF_DIR: &str = "pdfs";

/// Subdirectory holding text extracted from PDFs
pub const TEXT_DIR: &str = "pdf_text";

/// Outcome of storing a PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfWrite {
    /// The file did not exist and was written
    Written(PathBuf),

    /// A file with the same name already existed and was left untouched
    AlreadyPresent(PathBuf),
}

/// The on-disk mirror of fetched content
///
/// Layout under the root:
///
/// ```text
/// <root>/html/<url path>          mirrored pages, index.html for directories
/// <root>/pdfs/<sanitized name>    PDFs, never overwritten
/// <root>/pdf_text/<name>.txt      extracted text
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    root: PathBuf,
}

impl ArchiveStore {
    /// Opens a store rooted at `root`, creating its directory layout
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self { root: root.into() };
        store.ensure_layout()?;
        Ok(store)
    }

    /// Creates the root and the `html/`, `pdfs/` and `pdf_text/` directories
    pub fn ensure_layout(&self) -> StoreResult<()> {
        for dir in [self.html_root(), self.pdf_root(), self.text_root()] {
            fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir, source })?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn html_root(&self) -> PathBuf {
        self.root.join(HTML_DIR)
    }

    pub fn pdf_root(&self) -> PathBuf {
        self.root.join(PDF_DIR)
    }

    pub fn text_root(&self) -> PathBuf {
        self.root.join(TEXT_DIR)
    }

    /// Local path for an HTML page
    pub fn html_path(&self, target: &CrawlTarget) -> PathBuf {
        self.html_root().join(html_relative_path(target.path()))
    }

    /// Local path for a PDF
    pub fn pdf_path(&self, target: &CrawlTarget) -> PathBuf {
        self.pdf_root().join(pdf_file_name(target.path()))
    }

    /// Mirrored text path for a PDF stored under the PDF root
    pub fn text_path_for(&self, pdf_path: &Path) -> StoreResult<PathBuf> {
        let pdf_root = self.pdf_root();
        let relative = pdf_path
            .strip_prefix(&pdf_root)
            .map_err(|_| StoreError::OutsideArchive(pdf_path.to_path_buf()))?;
        Ok(self.text_root().join(text_relative_path(relative)))
    }

    /// Writes an HTML page, creating parent directories and overwriting any
    /// previous copy
    ///
    /// Extensionless pages can also be directories (`/about` next to
    /// `/about/team.html`). Whichever arrives second, the page ends up at
    /// `about/index.html` and its children sit beside it.
    pub fn write_html(&self, target: &CrawlTarget, body: &[u8]) -> StoreResult<PathBuf> {
        let mut path = self.html_path(target);
        if path.is_dir() {
            path.push("index.html");
        }

        if let Some(parent) = path.parent() {
            self.promote_file_ancestors(parent)?;
        }

        write_with_parents(&path, body)?;
        Ok(path)
    }

    /// Turns every stored page on the way to `dir` into a directory index
    fn promote_file_ancestors(&self, dir: &Path) -> StoreResult<()> {
        let html_root = self.html_root();
        let Ok(relative) = dir.strip_prefix(&html_root) else {
            return Ok(());
        };

        let mut current = html_root;
        for component in relative.components() {
            current.push(component);
            if current.is_file() {
                promote_to_directory(&current)?;
            } else if !current.exists() {
                break;
            }
        }

        Ok(())
    }

    /// Writes a PDF only if no file with the same name exists
    ///
    /// Uses create-new semantics, so a concurrent writer can never truncate
    /// an existing file.
    pub fn write_pdf_if_absent(&self, target: &CrawlTarget, bytes: &[u8]) -> StoreResult<PdfWrite> {
        let path = self.pdf_path(target);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Ok(PdfWrite::AlreadyPresent(path));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(PdfWrite::Written(path))
    }

    /// Lists every `*.pdf` file under the PDF root, recursively, in sorted order
    pub fn list_pdfs(&self) -> StoreResult<Vec<PathBuf>> {
        let mut pdfs = Vec::new();

        for entry in WalkDir::new(self.pdf_root()).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let is_pdf = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

            if is_pdf {
                pdfs.push(entry.into_path());
            }
        }

        Ok(pdfs)
    }

    /// Returns true if a non-empty text file exists at `text_path`
    ///
    /// Missing or zero-length files both mean extraction is still needed.
    pub fn has_text(&self, text_path: &Path) -> bool {
        fs::metadata(text_path)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Writes extracted text, creating parent directories
    pub fn write_text(&self, text_path: &Path, text: &str) -> StoreResult<()> {
        write_with_parents(text_path, text.as_bytes())
    }
}

/// Moves the file at `path` to `path/index.html`
fn promote_to_directory(path: &Path) -> StoreResult<()> {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".partial");
    let staged = PathBuf::from(staged);
    let index = path.join("index.html");

    fs::rename(path, &staged)
        .and_then(|_| fs::create_dir(path))
        .and_then(|_| fs::rename(&staged, &index))
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!("Moved page {} to {}", path.display(), index.display());
    Ok(())
}

fn write_with_parents(path: &Path, contents: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

//! Pure path mapping from URLs to archive-relative locations

use std::path::{Path, PathBuf};

/// Characters that are unsafe in file names on common filesystems
const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '/', '\\', '|', '?', '*'];

/// Maps a URL path to a file path relative to the HTML root
///
/// An empty path or one ending in `/` maps to `index.html` in that
/// directory. Empty, `.` and `..` segments are dropped so the result can
/// never leave the root.
pub fn html_relative_path(url_path: &str) -> PathBuf {
    let mut relative = PathBuf::new();
    for segment in url_path.split('/') {
        match segment {
            "" | "." | ".." => continue,
            _ => relative.push(segment),
        }
    }

    if url_path.is_empty() || url_path.ends_with('/') || relative.as_os_str().is_empty() {
        relative.push("index.html");
    }

    relative
}

/// Builds the stored file name for a PDF from its URL path
///
/// Takes the last path segment, replaces `< > : / \ | ? *` with `_`, and
/// forces a `.pdf` suffix (checked case-insensitively).
pub fn pdf_file_name(url_path: &str) -> String {
    let basename = url_path.rsplit('/').next().unwrap_or_default();
    let basename = if basename.is_empty() { "index" } else { basename };
    sanitize_pdf_filename(basename)
}

/// Sanitizes a PDF base name and forces the `.pdf` extension
///
/// # Examples
///
/// ```
/// use kete::store::sanitize_pdf_filename;
///
/// assert_eq!(sanitize_pdf_filename("form?v=2"), "form_v=2.pdf");
/// assert_eq!(sanitize_pdf_filename("Guide.PDF"), "Guide.PDF");
/// ```
pub fn sanitize_pdf_filename(basename: &str) -> String {
    let mut name: String = basename
        .chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect();

    if !name.to_ascii_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }

    name
}

/// Maps a PDF path relative to the PDF root to its text path relative to
/// the text root (extension replaced by `.txt`)
pub fn text_relative_path(pdf_relative: &Path) -> PathBuf {
    pdf_relative.with_extension("txt")
}

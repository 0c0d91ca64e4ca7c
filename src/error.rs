//! Error types for the service-directory library.
//!
//! Two distinct types reflect two distinct failure modes:
//!
//! * [`DirectoryError`]: **fatal**. The run cannot produce meaningful output
//!   (unreadable PDF, page range outside the document, no category headers).
//!   Returned as `Err(DirectoryError)` from the top-level `extract*` functions.
//!
//! * [`ExtractionWarning`]: **non-fatal**. One paragraph or one block looked
//!   wrong but every other record is fine. Stored in
//!   [`crate::output::ExtractionOutput::warnings`] so callers can review the
//!   anomalies after the batch completes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the service-directory library.
#[derive(Debug, Error)]
pub enum DirectoryError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Render errors ─────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The first page of the configured range lies beyond the document.
    #[error("Page {page} is out of range (document has {total} pages, page numbers are 0-based)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium could not produce a text layer for a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    PageNotExtractable { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium for your platform, or point --pdfium-lib / PDFIUM_LIB_PATH\n\
at an existing copy of the shared library.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Segmentation errors ───────────────────────────────────────────────
    /// No category header was recognised in the rendered text.
    ///
    /// Without headers the whole document would collapse into a single
    /// block attributed to no category, so the run is aborted instead.
    #[error("No category headers found in {chars} characters of rendered text.\nCheck --pages and the category denylist.")]
    SegmentationMiss { chars: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DirectoryError {
    /// True for every failure raised while turning the PDF into text.
    ///
    /// These abort the run before any output is written.
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            DirectoryError::FileNotFound { .. }
                | DirectoryError::PermissionDenied { .. }
                | DirectoryError::NotAPdf { .. }
                | DirectoryError::CorruptPdf { .. }
                | DirectoryError::PasswordRequired { .. }
                | DirectoryError::WrongPassword { .. }
                | DirectoryError::PageOutOfRange { .. }
                | DirectoryError::PageNotExtractable { .. }
                | DirectoryError::PdfiumBindingFailed(_)
        )
    }
}

/// A non-fatal anomaly noticed while segmenting or extracting.
///
/// The run continues; the warning is logged and kept in the output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ExtractionWarning {
    /// A paragraph survived filtering but yielded neither a title nor a
    /// description.
    #[error("Paragraph {paragraph} in '{category}' has no title and no description: {excerpt:?}")]
    MalformedParagraph {
        category: String,
        paragraph: usize,
        excerpt: String,
    },

    /// The same label text was recognised more than once. Every occurrence
    /// acts as a split point, so the category may be fragmented.
    #[error("Category label '{label}' occurs {occurrences} times")]
    DuplicateLabel { label: String, occurrences: usize },

    /// Splitting produced a different number of blocks than labels found.
    #[error("{labels} category labels but {blocks} blocks after splitting")]
    BlockCountMismatch { labels: usize, blocks: usize },
}

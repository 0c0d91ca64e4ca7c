//! PDF text rendering: turn an inclusive page range into one text blob.
//!
//! Rendering is delegated to pdfium through `pdfium-render`. The rest of the
//! pipeline only sees the [`TextRenderer`] trait, so tests (and callers with
//! their own text source) can plug in a different implementation.
//!
//! Each rendered page is followed by a form feed (`\x0c`), and line endings
//! are normalised to `\n`. The paragraph filter relies on both conventions.

use crate::config::PageRange;
use crate::error::DirectoryError;
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Page terminator appended after every rendered page.
pub const PAGE_BREAK: char = '\x0c';

/// Text of a rendered page range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText {
    /// Concatenated page text, each page terminated by [`PAGE_BREAK`].
    pub text: String,
    /// Pages actually rendered after clipping the range to the document.
    pub pages: PageRange,
    /// Page count of the whole document.
    pub total_pages: usize,
}

/// Renders a page range of a PDF file to a single UTF-8 string.
pub trait TextRenderer {
    fn render(&self, pdf_path: &Path, pages: PageRange) -> Result<RenderedText, DirectoryError>;
}

/// [`TextRenderer`] backed by the pdfium library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRenderer {
    library: Option<PathBuf>,
    password: Option<String>,
}

impl PdfiumRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load pdfium from this shared-library path instead of the system one.
    pub fn with_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library = Some(path.into());
        self
    }

    /// Open encrypted documents with this user password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    fn bind(&self) -> Result<Pdfium, DirectoryError> {
        let bindings = match self.library {
            Some(ref path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| DirectoryError::PdfiumBindingFailed(format!("{:?}", e)))?;
        Ok(Pdfium::new(bindings))
    }
}

impl TextRenderer for PdfiumRenderer {
    fn render(&self, pdf_path: &Path, pages: PageRange) -> Result<RenderedText, DirectoryError> {
        let pdfium = self.bind()?;
        let document = load_document(&pdfium, pdf_path, self.password.as_deref())?;

        let doc_pages = document.pages();
        let total_pages = doc_pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let clipped = pages
            .clip(total_pages)
            .ok_or(DirectoryError::PageOutOfRange {
                page: pages.start,
                total: total_pages,
            })?;
        if clipped != pages {
            warn!(
                "Page range {} exceeds the document; rendering {} instead",
                pages, clipped
            );
        }

        let mut text = String::new();
        for idx in clipped.start..=clipped.end {
            let page = doc_pages
                .get(idx as u16)
                .map_err(|e| DirectoryError::PageNotExtractable {
                    page: idx,
                    detail: format!("{:?}", e),
                })?;

            let page_text = page
                .text()
                .map_err(|e| DirectoryError::PageNotExtractable {
                    page: idx,
                    detail: format!("{:?}", e),
                })?
                .all();

            debug!("Rendered page {} → {} chars", idx, page_text.chars().count());
            text.push_str(&normalise_line_endings(&page_text));
            text.push(PAGE_BREAK);
        }

        Ok(RenderedText {
            text,
            pages: clipped,
            total_pages,
        })
    }
}

fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, DirectoryError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                DirectoryError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                DirectoryError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            DirectoryError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// CRLF and lone CR become LF.
pub fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Extract document metadata from a PDF without rendering any text.
pub fn extract_metadata(
    pdf_path: &Path,
    library: Option<&Path>,
    password: Option<&str>,
) -> Result<DocumentMetadata, DirectoryError> {
    let mut renderer = PdfiumRenderer::new();
    if let Some(lib) = library {
        renderer = renderer.with_library(lib);
    }
    let pdfium = renderer.bind()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

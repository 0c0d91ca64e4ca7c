//! Extraction entry points.
//!
//! [`extract`] is the usual way in: validate the PDF, render the configured
//! page range with pdfium, and run the text pipeline. The other entry points
//! cover a custom [`TextRenderer`], already-rendered text, in-memory PDF
//! bytes, and writing the CSV straight to disk.

use crate::config::ExtractionConfig;
use crate::error::{DirectoryError, ExtractionWarning};
use crate::output::{DocumentMetadata, ExtractionOutput, ExtractionStats, Record};
use crate::pipeline::paragraph::{self, filter_paragraphs};
use crate::pipeline::render::{self, PdfiumRenderer, TextRenderer};
use crate::pipeline::{fields, input, segment, split, write};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract directory records from a PDF file.
///
/// # Errors
/// Returns `Err(DirectoryError)` only for fatal errors:
/// - File not found, unreadable, or not a PDF
/// - pdfium cannot be loaded or cannot open the document
/// - The page range starts beyond the document
/// - No category header was found
///
/// Per-paragraph anomalies are reported in `output.warnings` instead.
pub fn extract(
    pdf_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, DirectoryError> {
    let pdf_path = input::validate_pdf_path(pdf_path.as_ref())?;
    let renderer = pdfium_renderer(config);
    extract_with_renderer(&pdf_path, &renderer, config)
}

/// Like [`extract`], but with a caller-supplied renderer.
///
/// The path is handed to the renderer as is; no `%PDF` check is made.
pub fn extract_with_renderer(
    pdf_path: impl AsRef<Path>,
    renderer: &dyn TextRenderer,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, DirectoryError> {
    let total_start = Instant::now();
    let pdf_path = pdf_path.as_ref();
    info!("Starting extraction: {} (pages {})", pdf_path.display(), config.pages);

    let render_start = Instant::now();
    let rendered = renderer.render(pdf_path, config.pages)?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    let chars = rendered.text.chars().count();
    info!(
        "Rendered {} pages ({} chars) in {}ms",
        rendered.pages.len(),
        chars,
        render_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_render_complete(rendered.pages.len(), chars);
    }

    let mut output = run_pipeline(&rendered.text, config)?;
    output.stats.total_pages = rendered.total_pages;
    output.stats.rendered_pages = rendered.pages.len();
    output.stats.render_duration_ms = render_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Extraction complete: {} records from {} categories, {}ms total",
        output.stats.records, output.stats.categories, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Run segmentation and field extraction on already-rendered text.
///
/// Page breaks are expected as form feeds and line endings as `\n`.
///
/// # Example
/// ```rust
/// use service_directory::{extract_from_text, ExtractionConfig};
///
/// let text = "Guide\n  FOOD PANTRIES  \nExample Org\n123 Main St, Springfield, IL 62704\n\
///             217-555-0100\nWe provide free meals.\n \n";
/// let output = extract_from_text(text, &ExtractionConfig::default()).unwrap();
/// assert_eq!(output.records[0].title, "Example Org");
/// assert_eq!(output.records[0].category, "FOOD PANTRIES");
/// ```
pub fn extract_from_text(
    text: &str,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, DirectoryError> {
    let start = Instant::now();
    let text = render::normalise_line_endings(text);
    let mut output = run_pipeline(&text, config)?;
    output.stats.total_duration_ms = start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Extract records from PDF bytes held in memory.
///
/// The bytes are written to a managed [`tempfile`] which is removed when
/// this function returns.
pub fn extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, DirectoryError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| DirectoryError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| DirectoryError::Internal(format!("tempfile write: {e}")))?;
    extract(tmp.path(), config)
}

/// Extract records from a PDF and write them as CSV to `output_path`.
///
/// Nothing is written when extraction fails.
pub fn extract_to_file(
    pdf_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, DirectoryError> {
    let output = extract(pdf_path, config)?;
    save_csv(&output.records, output_path.as_ref())?;
    Ok(output.stats)
}

/// Write `records` as CSV to `path`, atomically.
///
/// Rows go to a temp file in the destination directory, which is then
/// renamed over `path`, so readers never see a half-written file.
pub fn save_csv(records: &[Record], path: &Path) -> Result<(), DirectoryError> {
    let write_failed = |source: std::io::Error| DirectoryError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_failed)?;
    write::write_csv(&mut tmp, records).map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read PDF metadata without extracting any text.
pub fn inspect(
    pdf_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<DocumentMetadata, DirectoryError> {
    let pdf_path = input::validate_pdf_path(pdf_path.as_ref())?;
    render::extract_metadata(
        &pdf_path,
        config.pdfium_library.as_deref(),
        config.password.as_deref(),
    )
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn pdfium_renderer(config: &ExtractionConfig) -> PdfiumRenderer {
    let mut renderer = PdfiumRenderer::new();
    if let Some(ref lib) = config.pdfium_library {
        renderer = renderer.with_library(lib);
    }
    if let Some(ref pwd) = config.password {
        renderer = renderer.with_password(pwd);
    }
    renderer
}

/// Segment, split, filter, and extract. Timings are left to the caller.
fn run_pipeline(text: &str, config: &ExtractionConfig) -> Result<ExtractionOutput, DirectoryError> {
    let categories = segment::find_category_labels(text, &config.denylist);
    if categories.is_empty() {
        return Err(DirectoryError::SegmentationMiss {
            chars: text.chars().count(),
        });
    }
    info!("Found {} category labels", categories.len());

    let (blocks, mut warnings) = split::split_blocks(text, &categories, config.front_matter);
    let total_blocks = blocks.len();

    let mut stats = ExtractionStats {
        categories: categories.len(),
        blocks: total_blocks,
        ..Default::default()
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total_blocks);
    }

    let mut records = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        let category = block.category();
        if let Some(ref cb) = config.progress_callback {
            cb.on_block_start(index, total_blocks, &category);
        }

        let paragraphs = filter_paragraphs(
            &block.text,
            &config.paragraph_delimiter,
            config.min_line_breaks,
        );
        stats.candidate_paragraphs += paragraphs.kept.len() + paragraphs.discarded;
        stats.discarded_paragraphs += paragraphs.discarded;

        let before = records.len();
        for (n, text) in paragraphs.kept.iter().enumerate() {
            let fields = fields::extract_fields(text);

            if fields.is_malformed() {
                let excerpt = paragraph::excerpt(text);
                warn!(
                    "Paragraph {} in {:?} has no title and no description: {:?}",
                    n, category, excerpt
                );
                warnings.push(ExtractionWarning::MalformedParagraph {
                    category: category.clone(),
                    paragraph: n,
                    excerpt,
                });
                stats.malformed_records += 1;
                if config.skip_malformed {
                    continue;
                }
            }

            records.push(Record {
                title: fields.title,
                category: category.clone(),
                address: fields.address,
                phone: fields.phone,
                email: fields.email,
                description: fields.description,
            });
        }

        let emitted = records.len() - before;
        debug!("Block {} ({:?}): {} records", index, category, emitted);
        if let Some(ref cb) = config.progress_callback {
            cb.on_block_complete(index, total_blocks, &category, emitted);
        }
    }

    stats.records = records.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(records.len(), warnings.len());
    }

    Ok(ExtractionOutput {
        records,
        categories,
        warnings,
        stats,
    })
}

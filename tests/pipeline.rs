//! Integration tests for the extraction pipeline.
//!
//! Rendering is replaced by an in-memory [`TextRenderer`] so the tests need
//! neither pdfium nor a PDF fixture. The single test that drives real pdfium
//! is gated behind `E2E_ENABLED` and `SVC2CSV_TEST_PDF`.
//!
//! Run with:
//!   cargo test --test pipeline
//!
//! Against a real directory:
//!   E2E_ENABLED=1 SVC2CSV_TEST_PDF=directory.pdf cargo test --test pipeline -- --nocapture

use service_directory::{
    extract, extract_to_file, extract_with_renderer, save_csv, DirectoryError, ExtractionConfig,
    ExtractionProgressCallback, ExtractionWarning, PageRange, RenderedText, TextRenderer,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Renders a fixed list of page texts, one form feed after each page.
struct StubRenderer {
    pages: Vec<&'static str>,
}

impl TextRenderer for StubRenderer {
    fn render(&self, _pdf_path: &Path, pages: PageRange) -> Result<RenderedText, DirectoryError> {
        let total = self.pages.len();
        let clipped = pages.clip(total).ok_or(DirectoryError::PageOutOfRange {
            page: pages.start,
            total,
        })?;
        let text = self.pages[clipped.start..=clipped.end]
            .iter()
            .map(|page| format!("{page}\x0c"))
            .collect();
        Ok(RenderedText {
            text,
            pages: clipped,
            total_pages: total,
        })
    }
}

const COVER: &str = "Community Resource Guide 2019\n\n  TABLE OF CONTENTS  \n\nFood 1\nHousing 2\n";

const FOOD_PAGE: &str = "\n  FOOD PANTRIES  \n\nExample Org\n123 Main St, Springfield, IL 62704\n217-555-0100\ncontact@example.org\nWe provide free meals.\n \nSecond Helping Pantry\n45 Oak Ave, Springfield, IL 62701\n217-555-0199\nWeekly groceries for families.\n \n(continued)";

const HOUSING_PAGE: &str = "\n \n  HOUSING  \n\nSafe Harbor Shelter\n9 Elm St, Springfield, IL 62702\n217-555-0111\nshelter@example.org\nEmergency beds\nand case management.\n";

fn guide() -> StubRenderer {
    StubRenderer {
        pages: vec![COVER, FOOD_PAGE, HOUSING_PAGE],
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl ExtractionProgressCallback for Recorder {
    fn on_render_complete(&self, pages: usize, _chars: usize) {
        self.events.lock().unwrap().push(format!("render {pages}"));
    }
    fn on_extraction_start(&self, total_blocks: usize) {
        self.events.lock().unwrap().push(format!("start {total_blocks}"));
    }
    fn on_block_complete(&self, index: usize, _total: usize, label: &str, records: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("block {index} {label} {records}"));
    }
    fn on_extraction_complete(&self, total_records: usize, warnings: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done {total_records} {warnings}"));
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn default_range_skips_the_cover() {
    let output = extract_with_renderer("guide.pdf", &guide(), &ExtractionConfig::default()).unwrap();

    assert_eq!(output.categories, vec!["FOOD PANTRIES", "HOUSING"]);
    assert_eq!(output.stats.total_pages, 3);
    assert_eq!(output.stats.rendered_pages, 2);
    assert_eq!(output.records.len(), 3);
    assert!(output.warnings.is_empty());

    let titles: Vec<&str> = output.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Example Org", "Second Helping Pantry", "Safe Harbor Shelter"]
    );
    assert_eq!(output.records[2].category, "HOUSING");
    assert_eq!(output.records[2].email, "shelter@example.org");
}

#[test]
fn csv_matches_expected_rows() {
    let output = extract_with_renderer("guide.pdf", &guide(), &ExtractionConfig::default()).unwrap();
    let expected = "title, category, address, phone, email, description,\n\
Example Org, FOOD PANTRIES, 123 Main St. Springfield. IL 62704, 217-555-0100, contact@example.org, We provide free meals.,\n\
Second Helping Pantry, FOOD PANTRIES, 45 Oak Ave. Springfield. IL 62701, 217-555-0199, , Weekly groceries for families.,\n\
Safe Harbor Shelter, HOUSING, 9 Elm St. Springfield. IL 62702, 217-555-0111, shelter@example.org, Emergency beds and case management.,\n";
    assert_eq!(output.to_csv(), expected);
}

#[test]
fn rerun_is_byte_identical() {
    let config = ExtractionConfig::default();
    let first = extract_with_renderer("guide.pdf", &guide(), &config).unwrap();
    let second = extract_with_renderer("guide.pdf", &guide(), &config).unwrap();
    assert_eq!(first.to_csv(), second.to_csv());
    assert_eq!(first.records, second.records);
}

#[test]
fn cover_page_contributes_a_category_when_selected() {
    let config = ExtractionConfig::builder()
        .pages(PageRange::new(0, 2).unwrap())
        .build()
        .unwrap();
    let output = extract_with_renderer("guide.pdf", &guide(), &config).unwrap();
    assert_eq!(
        output.categories,
        vec!["TABLE OF CONTENTS", "FOOD PANTRIES", "HOUSING"]
    );
    assert_eq!(output.stats.blocks, 3);
    assert_eq!(output.records.len(), 3);
}

#[test]
fn range_past_the_end_is_clipped() {
    let config = ExtractionConfig::builder()
        .pages(PageRange::new(2, 40).unwrap())
        .build()
        .unwrap();
    let output = extract_with_renderer("guide.pdf", &guide(), &config).unwrap();
    assert_eq!(output.stats.rendered_pages, 1);
    assert_eq!(output.categories, vec!["HOUSING"]);
}

#[test]
fn range_starting_past_the_end_is_fatal() {
    let config = ExtractionConfig::builder()
        .pages(PageRange::single(9))
        .build()
        .unwrap();
    let err = extract_with_renderer("guide.pdf", &guide(), &config).unwrap_err();
    assert!(matches!(err, DirectoryError::PageOutOfRange { page: 9, total: 3 }));
    assert!(err.is_render_error());
}

#[test]
fn page_without_headers_is_a_segmentation_miss() {
    let renderer = StubRenderer {
        pages: vec!["cover", "just some prose\nwithout headers\n"],
    };
    let err = extract_with_renderer("x.pdf", &renderer, &ExtractionConfig::default()).unwrap_err();
    assert!(matches!(err, DirectoryError::SegmentationMiss { .. }));
}

#[test]
fn progress_events_follow_the_blocks() {
    let recorder = Arc::new(Recorder::default());
    let config = ExtractionConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    extract_with_renderer("guide.pdf", &guide(), &config).unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "render 2",
            "start 2",
            "block 0 FOOD PANTRIES 2",
            "block 1 HOUSING 1",
            "done 3 0",
        ]
    );
}

#[test]
fn body_text_repeating_a_label_is_flagged() {
    let renderer = StubRenderer {
        pages: vec![
            "cover",
            "\n  SHELTERS  \n\nNight Owl Shelter\n1 Bay St, Tampa, FL 33602\n813-555-0100\nSee SHELTERS index.\n",
        ],
    };
    let output = extract_with_renderer("x.pdf", &renderer, &ExtractionConfig::default()).unwrap();
    assert_eq!(output.categories, vec!["SHELTERS"]);
    assert!(output
        .warnings
        .contains(&ExtractionWarning::BlockCountMismatch { labels: 1, blocks: 2 }));
    assert!(output.records.iter().all(|r| r.category == "SHELTERS"));
}

#[test]
fn save_csv_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("listings.csv");
    let output = extract_with_renderer("guide.pdf", &guide(), &ExtractionConfig::default()).unwrap();

    save_csv(&output.records, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, output.to_csv());
}

#[test]
fn save_csv_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listings.csv");
    std::fs::write(&path, "stale contents").unwrap();

    save_csv(&[], &path).unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "title, category, address, phone, email, description,\n"
    );
}

#[test]
fn extract_rejects_non_pdf_before_loading_pdfium() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listings.csv");
    std::fs::write(&path, "title, category\n").unwrap();

    let err = extract(&path, &ExtractionConfig::default()).unwrap_err();
    assert!(matches!(err, DirectoryError::NotAPdf { .. }));
}

#[test]
fn failed_extraction_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");

    let err = extract_to_file(dir.path().join("missing.pdf"), &out, &ExtractionConfig::default())
        .unwrap_err();

    assert!(matches!(err, DirectoryError::FileNotFound { .. }));
    assert!(!out.exists());
}

/// Runs the real pdfium renderer when a directory PDF is supplied.
#[test]
fn e2e_real_directory() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
        return;
    }
    let Some(pdf) = std::env::var_os("SVC2CSV_TEST_PDF").map(PathBuf::from) else {
        println!("SKIP: set SVC2CSV_TEST_PDF to a directory PDF");
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let output = extract(&pdf, &ExtractionConfig::default()).unwrap();
    println!(
        "{} records, {} categories, {} warnings",
        output.records.len(),
        output.categories.len(),
        output.warnings.len()
    );
    assert!(!output.categories.is_empty());
    for record in &output.records {
        assert!(output
            .categories
            .iter()
            .any(|c| c.replace('\n', " ") == record.category));
    }
}

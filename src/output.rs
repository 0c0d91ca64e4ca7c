//! Output types returned by the extraction entry points.

use crate::error::ExtractionWarning;
use crate::pipeline::write;
use serde::{Deserialize, Serialize};

/// One directory entry: the persisted unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    /// Category label of the enclosing block, line breaks replaced by spaces.
    pub category: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Text left over after the other fields were claimed. Always present.
    pub description: String,
}

/// Complete result of one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Records in document order.
    pub records: Vec<Record>,

    /// Category labels as found, in document order, duplicates included.
    pub categories: Vec<String>,

    /// Non-fatal anomalies noticed during the run.
    pub warnings: Vec<ExtractionWarning>,

    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// The records in the fixed CSV row format, header included.
    pub fn to_csv(&self) -> String {
        write::render_csv(&self.records)
    }
}

/// Counters and timings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Page count of the whole document (0 when extracting from text).
    pub total_pages: usize,
    /// Pages rendered after clipping the configured range.
    pub rendered_pages: usize,
    /// Category labels found, duplicates included.
    pub categories: usize,
    /// Blocks processed (front matter included when kept).
    pub blocks: usize,
    /// Candidate paragraphs before filtering.
    pub candidate_paragraphs: usize,
    pub discarded_paragraphs: usize,
    pub records: usize,
    /// Paragraphs with neither title nor description.
    pub malformed_records: usize,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// PDF document metadata, as reported by `inspect`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

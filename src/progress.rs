//! Progress-callback trait for per-block extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks the category blocks.
//!
//! # Example
//!
//! ```rust
//! use service_directory::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct RecordCounter {
//!     records: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for RecordCounter {
//!     fn on_block_complete(&self, _index: usize, _total: usize, _label: &str, records: usize) {
//!         self.records.fetch_add(records, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(RecordCounter { records: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction pipeline as it progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The pipeline is sequential; events arrive in
/// document order on the calling thread.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after the PDF pages have been rendered to text.
    ///
    /// # Arguments
    /// * `pages` : number of pages rendered
    /// * `chars` : length of the rendered text in characters
    fn on_render_complete(&self, pages: usize, chars: usize) {
        let _ = (pages, chars);
    }

    /// Called once after segmentation, before any paragraph is extracted.
    ///
    /// # Arguments
    /// * `total_blocks` : number of category blocks that will be processed
    fn on_extraction_start(&self, total_blocks: usize) {
        let _ = total_blocks;
    }

    /// Called before the paragraphs of a block are extracted.
    fn on_block_start(&self, index: usize, total_blocks: usize, label: &str) {
        let _ = (index, total_blocks, label);
    }

    /// Called after a block's records have been produced.
    ///
    /// # Arguments
    /// * `index`        : 0-based block index
    /// * `total_blocks` : number of blocks
    /// * `label`        : category label of the block
    /// * `records`      : records emitted for this block
    fn on_block_complete(&self, index: usize, total_blocks: usize, label: &str, records: usize) {
        let _ = (index, total_blocks, label, records);
    }

    /// Called once after every block has been processed.
    fn on_extraction_complete(&self, total_records: usize, warnings: usize) {
        let _ = (total_records, warnings);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

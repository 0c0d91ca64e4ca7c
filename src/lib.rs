//! # service-directory
//!
//! Turn a fixed-layout PDF service directory into one CSV row per listed
//! organization: title, category, address, phone, email and description.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     check the path and the %PDF magic
//!  ├─ 2. Render    page text via pdfium, one form feed per page
//!  ├─ 3. Segment   find all-caps category headers
//!  ├─ 4. Split     one block per header, front matter dropped
//!  ├─ 5. Filter    split blocks into entries, drop continuations and noise
//!  ├─ 6. Fields    claim title → address → phone → email; the rest is the description
//!  └─ 7. Output    records + warnings + stats, CSV on demand
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use service_directory::{extract, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("directory.pdf", &config)?;
//!     print!("{}", output.to_csv());
//!     eprintln!("{} records, {} warnings", output.records.len(), output.warnings.len());
//!     Ok(())
//! }
//! ```
//!
//! Text that was rendered elsewhere can go straight to [`extract_from_text`],
//! and any other text source can be plugged in through [`TextRenderer`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `svc2csv` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! service-directory = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    CategoryDenylist, DenylistEntry, ExtractionConfig, ExtractionConfigBuilder, FrontMatter,
    PageRange,
};
pub use error::{DirectoryError, ExtractionWarning};
pub use extract::{
    extract, extract_from_bytes, extract_from_text, extract_to_file, extract_with_renderer,
    inspect, save_csv,
};
pub use output::{DocumentMetadata, ExtractionOutput, ExtractionStats, Record};
pub use pipeline::fields::{extract_fields, FieldTuple};
pub use pipeline::render::{PdfiumRenderer, RenderedText, TextRenderer};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};

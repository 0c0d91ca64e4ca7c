//! Configuration types for directory extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The document-coupled knowledge (which
//! pages hold the listings, which all-caps tokens are not category headers)
//! lives here as data rather than inside the matching code.

use crate::error::DirectoryError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for one extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use service_directory::{ExtractionConfig, PageRange};
///
/// let config = ExtractionConfig::builder()
///     .pages(PageRange::new(1, 12).unwrap())
///     .deny_token("HUD ", "agency abbreviation")
///     .build()
///     .unwrap();
/// assert_eq!(config.pages.end, 12);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Inclusive, 0-based page range to render. Default: `1..=12`.
    ///
    /// Page 0 is the cover and the listings stop after page 12 in the
    /// reference directory.
    pub pages: PageRange,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit path to the pdfium shared library. If None, the system
    /// library is used.
    pub pdfium_library: Option<PathBuf>,

    /// All-caps tokens that look like category headers but are not.
    pub denylist: CategoryDenylist,

    /// Paragraph boundary inside a category block. Default: `"\n \n"`.
    pub paragraph_delimiter: String,

    /// Minimum number of line breaks a trimmed paragraph needs to count as
    /// an entry. Default: 3 (two or fewer line breaks is a stray fragment).
    pub min_line_breaks: usize,

    /// What to do with the text preceding the first category header.
    /// Default: [`FrontMatter::Discard`].
    pub front_matter: FrontMatter,

    /// Drop paragraphs that yield neither a title nor a description instead
    /// of emitting a near-empty record. Default: false (emit and warn).
    pub skip_malformed: bool,

    /// Optional progress callback for per-block events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pages: PageRange::default(),
            password: None,
            pdfium_library: None,
            denylist: CategoryDenylist::default(),
            paragraph_delimiter: DEFAULT_PARAGRAPH_DELIMITER.to_string(),
            min_line_breaks: 3,
            front_matter: FrontMatter::default(),
            skip_malformed: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_library", &self.pdfium_library)
            .field("denylist", &self.denylist.len())
            .field("paragraph_delimiter", &self.paragraph_delimiter)
            .field("min_line_breaks", &self.min_line_breaks)
            .field("front_matter", &self.front_matter)
            .field("skip_malformed", &self.skip_malformed)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Paragraph boundary observed in the rendered layout.
pub const DEFAULT_PARAGRAPH_DELIMITER: &str = "\n \n";

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn pages(mut self, pages: PageRange) -> Self {
        self.config.pages = pages;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    /// Replace the whole denylist table.
    pub fn denylist(mut self, denylist: CategoryDenylist) -> Self {
        self.config.denylist = denylist;
        self
    }

    /// Add one token to the denylist table.
    pub fn deny_token(mut self, token: impl Into<String>, reason: impl Into<String>) -> Self {
        self.config.denylist.push(token, reason);
        self
    }

    pub fn paragraph_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.paragraph_delimiter = delimiter.into();
        self
    }

    pub fn min_line_breaks(mut self, n: usize) -> Self {
        self.config.min_line_breaks = n;
        self
    }

    pub fn front_matter(mut self, policy: FrontMatter) -> Self {
        self.config.front_matter = policy;
        self
    }

    pub fn skip_malformed(mut self, v: bool) -> Self {
        self.config.skip_malformed = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, DirectoryError> {
        let c = &self.config;
        if c.pages.start > c.pages.end {
            return Err(DirectoryError::InvalidConfig(format!(
                "page range start ({}) must be <= end ({})",
                c.pages.start, c.pages.end
            )));
        }
        if c.paragraph_delimiter.is_empty() {
            return Err(DirectoryError::InvalidConfig(
                "paragraph delimiter must not be empty".into(),
            ));
        }
        if let Some(entry) = c.denylist.iter().find(|e| e.token.trim().is_empty()) {
            return Err(DirectoryError::InvalidConfig(format!(
                "denylist token must contain a non-space character (reason: {})",
                entry.reason
            )));
        }
        Ok(self.config)
    }
}

// ── Page range ───────────────────────────────────────────────────────────

/// An inclusive, 0-based range of PDF pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl Default for PageRange {
    fn default() -> Self {
        Self { start: 1, end: 12 }
    }
}

impl PageRange {
    /// Create a validated range; `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Result<Self, DirectoryError> {
        if start > end {
            return Err(DirectoryError::InvalidConfig(format!(
                "page range start ({start}) must be <= end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one page.
    pub fn single(page: usize) -> Self {
        Self {
            start: page,
            end: page,
        }
    }

    /// Number of pages in the range.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false: a valid range holds at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Clip the range to a document with `total_pages` pages.
    ///
    /// Returns `None` when the first page lies beyond the document.
    pub fn clip(&self, total_pages: usize) -> Option<PageRange> {
        if self.start >= total_pages {
            return None;
        }
        Some(PageRange {
            start: self.start,
            end: self.end.min(total_pages - 1),
        })
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ── Front matter ─────────────────────────────────────────────────────────

/// Treatment of the text before the first recognised category header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrontMatter {
    /// Drop it: it is cover text and a table of contents. (default)
    #[default]
    Discard,
    /// Keep it as a block with an empty category.
    Keep,
}

// ── Category denylist ────────────────────────────────────────────────────

/// One all-caps token that must never start or appear inside a category
/// header, with the reason it is listed.
///
/// A space in `token` matches any single whitespace character, so `"FL "`
/// matches `FL` followed by a space, tab, or newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenylistEntry {
    pub token: String,
    pub reason: String,
}

/// Table of false-positive category tokens.
///
/// Serialises as a plain JSON array of `{ "token", "reason" }` objects so the
/// table can be audited and replaced without touching the segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryDenylist {
    entries: Vec<DenylistEntry>,
}

const DEFAULT_DENYLIST: &[(&str, &str)] = &[
    ("FL ", "state abbreviation in addresses"),
    ("PM ", "time of day in opening hours"),
    ("ACS ", "agency abbreviation"),
    ("PA ", "state abbreviation in addresses"),
    ("ID ", "identification requirement"),
    ("FADAA ", "association acronym"),
    ("FPL ", "federal poverty level"),
    ("FTRI ", "telecommunications relay acronym"),
    ("LLC ", "company suffix"),
    ("NW ", "street direction"),
    ("DL: ", "field label"),
    ("DB: ", "field label"),
    ("II: ", "field label"),
    ("SS ", "social security abbreviation"),
    ("SOC:", "field label"),
    ("DCF ", "children and families department acronym"),
    ("TTY: ", "teletype phone label"),
];

impl Default for CategoryDenylist {
    fn default() -> Self {
        Self {
            entries: DEFAULT_DENYLIST
                .iter()
                .map(|(token, reason)| DenylistEntry {
                    token: (*token).to_string(),
                    reason: (*reason).to_string(),
                })
                .collect(),
        }
    }
}

impl CategoryDenylist {
    /// An empty table: every structural match is accepted.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a token.
    pub fn push(&mut self, token: impl Into<String>, reason: impl Into<String>) {
        self.entries.push(DenylistEntry {
            token: token.into(),
            reason: reason.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &DenylistEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON array of `{ "token", "reason" }` objects.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        serde_json::from_str(json)
            .map_err(|e| DirectoryError::InvalidConfig(format!("invalid denylist JSON: {e}")))
    }
}

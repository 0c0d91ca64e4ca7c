//! Paragraph filtering: split a category block into organization entries.
//!
//! Entries are separated by a line holding a single space (`"\n \n"`), the
//! boundary the rendered layout leaves between listings. Candidates that are
//! empty, continuation notes, page-break artifacts, or too short to be an
//! entry are dropped.

use std::fmt;
use tracing::debug;

/// Why a candidate paragraph was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Nothing left after trimming.
    Empty,
    /// Starts with `(`: a "(continued)" or footnote line.
    Continuation,
    /// Contains a form feed followed by `(`: a page-break artifact.
    PageBreakArtifact,
    /// Fewer line breaks than the configured minimum.
    TooShort { line_breaks: usize },
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardReason::Empty => write!(f, "empty"),
            DiscardReason::Continuation => write!(f, "continuation line"),
            DiscardReason::PageBreakArtifact => write!(f, "page-break artifact"),
            DiscardReason::TooShort { line_breaks } => {
                write!(f, "too short ({line_breaks} line breaks)")
            }
        }
    }
}

/// Check one trimmed candidate against the filter rules.
pub fn screen(candidate: &str, min_line_breaks: usize) -> Option<DiscardReason> {
    if candidate.is_empty() {
        return Some(DiscardReason::Empty);
    }
    if candidate.starts_with('(') {
        return Some(DiscardReason::Continuation);
    }
    if candidate.contains("\x0c(") {
        return Some(DiscardReason::PageBreakArtifact);
    }
    let line_breaks = candidate.matches('\n').count();
    if line_breaks < min_line_breaks {
        return Some(DiscardReason::TooShort { line_breaks });
    }
    None
}

/// Result of filtering one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredParagraphs {
    /// Surviving paragraphs, trimmed, in block order.
    pub kept: Vec<String>,
    /// Number of candidates dropped.
    pub discarded: usize,
}

/// Split `block` on `delimiter` and keep the candidates that pass [`screen`].
pub fn filter_paragraphs(block: &str, delimiter: &str, min_line_breaks: usize) -> FilteredParagraphs {
    let mut out = FilteredParagraphs::default();

    for candidate in block.split(delimiter) {
        let candidate = candidate.trim();
        match screen(candidate, min_line_breaks) {
            None => out.kept.push(candidate.to_string()),
            Some(reason) => {
                debug!("Discarded paragraph ({}): {:?}", reason, excerpt(candidate));
                out.discarded += 1;
            }
        }
    }

    out
}

/// First line of a paragraph, shortened for log messages.
pub(crate) fn excerpt(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > 40 {
        let short: String = line.chars().take(39).collect();
        format!("{short}\u{2026}")
    } else {
        line.to_string()
    }
}

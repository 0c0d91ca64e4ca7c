//! Block splitting: cut the document into one chunk per category label.
//!
//! Labels are applied as delimiters one at a time, in document order. Each
//! label splits every fragment produced so far, so a label that recurs in
//! the text splits at all of its occurrences, and a label whose text has
//! already been consumed is a no-op.

use crate::config::FrontMatter;
use crate::error::ExtractionWarning;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A contiguous chunk of document text and the label it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBlock {
    /// Raw label text as found by the segmenter (may contain newlines).
    pub label: String,
    pub text: String,
}

impl CategoryBlock {
    /// Label as written to output: line breaks become spaces.
    pub fn category(&self) -> String {
        self.label.replace('\n', " ")
    }
}

/// Split `text` on every label in turn, flattening the fragments in order.
///
/// The result always holds at least one fragment.
pub fn split_on_labels(text: &str, labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .fold(vec![text.to_string()], |fragments, label| {
            fragments
                .iter()
                .flat_map(|fragment| fragment.split(label.as_str()))
                .map(str::to_string)
                .collect()
        })
}

/// Split `text` into category blocks and attribute each block to a label.
///
/// The leading fragment (text before the first label) is front matter and
/// is handled according to `front_matter`. Remaining fragments are paired
/// with labels by position. Anomalies are returned as warnings.
pub fn split_blocks(
    text: &str,
    labels: &[String],
    front_matter: FrontMatter,
) -> (Vec<CategoryBlock>, Vec<ExtractionWarning>) {
    let mut warnings = duplicate_label_warnings(labels);

    let mut fragments = split_on_labels(text, labels).into_iter();
    let leading = fragments.next().unwrap_or_default();
    let fragments: Vec<String> = fragments.collect();

    if fragments.len() != labels.len() {
        warn!(
            "{} category labels but {} blocks after splitting",
            labels.len(),
            fragments.len()
        );
        warnings.push(ExtractionWarning::BlockCountMismatch {
            labels: labels.len(),
            blocks: fragments.len(),
        });
    }

    let mut blocks = Vec::with_capacity(fragments.len() + 1);
    match front_matter {
        FrontMatter::Discard => {
            debug!("Discarded {} chars of front matter", leading.chars().count())
        }
        FrontMatter::Keep => blocks.push(CategoryBlock {
            label: String::new(),
            text: leading,
        }),
    }

    for (i, fragment) in fragments.into_iter().enumerate() {
        let label = labels.get(i).or(labels.last()).cloned().unwrap_or_default();
        blocks.push(CategoryBlock {
            label,
            text: fragment,
        });
    }

    (blocks, warnings)
}

fn duplicate_label_warnings(labels: &[String]) -> Vec<ExtractionWarning> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_default() += 1;
    }

    let mut seen = Vec::new();
    let mut warnings = Vec::new();
    for label in labels {
        let occurrences = counts[label.as_str()];
        if occurrences > 1 && !seen.contains(&label) {
            seen.push(label);
            warn!("Category label {:?} occurs {} times", label, occurrences);
            warnings.push(ExtractionWarning::DuplicateLabel {
                label: label.replace('\n', " "),
                occurrences,
            });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_on_each_label_in_order() {
        let text = "cover FOOD a b HOUSING c";
        let fragments = split_on_labels(text, &owned(&["FOOD", "HOUSING"]));
        assert_eq!(fragments, vec!["cover ", " a b ", " c"]);
    }

    #[test]
    fn missing_label_is_a_no_op() {
        let text = "cover FOOD a";
        let fragments = split_on_labels(text, &owned(&["FOOD", "LEGAL"]));
        assert_eq!(fragments, vec!["cover ", " a"]);
    }

    #[test]
    fn no_labels_keeps_text_whole() {
        assert_eq!(split_on_labels("all text", &[]), vec!["all text"]);
    }

    #[test]
    fn repeated_label_splits_everywhere_once() {
        let text = "x FOOD a FOOD b";
        let fragments = split_on_labels(text, &owned(&["FOOD", "FOOD"]));
        assert_eq!(fragments, vec!["x ", " a ", " b"]);
    }

    #[test]
    fn block_count_matches_label_count() {
        let labels = owned(&["FOOD", "HOUSING", "LEGAL"]);
        let text = "cover\n  FOOD  \na\n  HOUSING  \nb\n  LEGAL  \nc";
        let (blocks, warnings) = split_blocks(text, &labels, FrontMatter::Discard);
        assert_eq!(blocks.len(), labels.len());
        assert!(warnings.is_empty());
        assert_eq!(blocks[0].label, "FOOD");
        assert_eq!(blocks[0].text, "  \na\n  ");
        assert_eq!(blocks[2].label, "LEGAL");
    }

    #[test]
    fn front_matter_can_be_kept() {
        let labels = owned(&["FOOD"]);
        let (blocks, _) = split_blocks("cover FOOD a", &labels, FrontMatter::Keep);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].label, "");
        assert_eq!(blocks[0].text, "cover ");
        assert_eq!(blocks[1].label, "FOOD");
    }

    #[test]
    fn duplicate_labels_are_flagged() {
        let labels = owned(&["FOOD", "HOUSING", "FOOD"]);
        let text = "c FOOD a HOUSING b FOOD d";
        let (blocks, warnings) = split_blocks(text, &labels, FrontMatter::Discard);
        assert_eq!(blocks.len(), 3);
        assert!(warnings.contains(&ExtractionWarning::DuplicateLabel {
            label: "FOOD".into(),
            occurrences: 2,
        }));
    }

    #[test]
    fn surplus_blocks_inherit_last_label() {
        // `FOOD` also appears in the body, producing an extra fragment.
        let labels = owned(&["FOOD"]);
        let (blocks, warnings) = split_blocks("c FOOD a FOOD b", &labels, FrontMatter::Discard);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.label == "FOOD"));
        assert_eq!(
            warnings,
            vec![ExtractionWarning::BlockCountMismatch { labels: 1, blocks: 2 }]
        );
    }

    #[test]
    fn category_replaces_line_breaks() {
        let block = CategoryBlock {
            label: "MENTAL HEALTH &\nCOUNSELING".into(),
            text: String::new(),
        };
        assert_eq!(block.category(), "MENTAL HEALTH & COUNSELING");
    }
}

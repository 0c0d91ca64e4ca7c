//! Category segmentation: find the section headers of the directory.
//!
//! Headers are all-caps runs set apart from the text by a wide gap. A header
//! is a run of two or more characters from `A–Z`, `-`, `&`, `:` and
//! whitespace that
//!
//! 1. follows at least one whitespace character,
//! 2. is followed by at least two whitespace characters, and
//! 3. has no character at a position where three or more whitespace
//!    characters begin, or where a [`CategoryDenylist`] token begins.
//!
//! Rule 3 needs lookahead at every character of the run, which the `regex`
//! crate does not offer, so the scan is written out by hand. It reproduces a
//! backtracking regex: the leading whitespace is greedy, the run is greedy
//! and shrinks until the trailing gap fits, the gap is consumed greedily, and
//! scanning resumes after the gap.

use crate::config::CategoryDenylist;
use std::ops::Range;
use tracing::debug;

const MIN_LABEL_CHARS: usize = 2;
const MIN_TRAILING_GAP: usize = 2;
const WIDE_GAP: usize = 3;

/// Find every category label in `text`, in document order.
///
/// Labels are returned verbatim (they may contain line breaks) and are not
/// deduplicated.
pub fn find_category_labels(text: &str, denylist: &CategoryDenylist) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut labels = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        match match_header_at(&chars, pos, denylist) {
            Some(m) => {
                let label: String = chars[m.label].iter().collect();
                debug!("Category label: {:?}", label);
                labels.push(label);
                pos = m.end.max(pos + 1);
            }
            None => pos += 1,
        }
    }

    labels
}

struct HeaderMatch {
    label: Range<usize>,
    end: usize,
}

fn match_header_at(chars: &[char], start: usize, denylist: &CategoryDenylist) -> Option<HeaderMatch> {
    let lead_end = whitespace_run_end(chars, start);
    if lead_end == start {
        return None;
    }

    for label_start in (start + 1..=lead_end).rev() {
        let run_end = label_run_end(chars, label_start, denylist);
        for label_end in (label_start + MIN_LABEL_CHARS..=run_end).rev() {
            let gap_end = whitespace_run_end(chars, label_end);
            if gap_end - label_end >= MIN_TRAILING_GAP {
                return Some(HeaderMatch {
                    label: label_start..label_end,
                    end: gap_end,
                });
            }
        }
    }

    None
}

fn label_run_end(chars: &[char], start: usize, denylist: &CategoryDenylist) -> usize {
    let mut end = start;
    while end < chars.len() && is_label_char(chars[end]) && !is_blocked(chars, end, denylist) {
        end += 1;
    }
    end
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_uppercase() || matches!(c, '-' | '&' | ':') || c.is_whitespace()
}

fn is_blocked(chars: &[char], pos: usize, denylist: &CategoryDenylist) -> bool {
    whitespace_run_end(chars, pos) - pos >= WIDE_GAP
        || denylist.iter().any(|entry| token_at(chars, pos, &entry.token))
}

/// True when `token` occurs at `pos`; a space in the token matches any
/// whitespace character.
fn token_at(chars: &[char], pos: usize, token: &str) -> bool {
    let mut i = pos;
    for expected in token.chars() {
        let Some(&actual) = chars.get(i) else {
            return false;
        };
        let ok = if expected == ' ' {
            actual.is_whitespace()
        } else {
            actual == expected
        };
        if !ok {
            return false;
        }
        i += 1;
    }
    true
}

fn whitespace_run_end(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() && chars[end].is_whitespace() {
        end += 1;
    }
    end
}

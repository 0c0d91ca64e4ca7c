//! Field extraction: pull title, address, phone and email out of a paragraph.
//!
//! Extraction is an ordered fold over [`Field::ORDER`]. Each step is a pure
//! function from the residual text to `(value, residual')`: it finds its
//! pattern, cuts the matched span out of the residual, and hands what is left
//! to the next step. Whatever survives all four steps is the description.
//!
//! Order matters: a later step only sees text that no earlier step claimed.
//!
//! Every value is trimmed, has line breaks turned into spaces, and has
//! commas turned into periods (the output is comma-delimited and unquoted).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::ops::Range;

/// One capitalised word or connective, with its trailing whitespace.
static RE_TITLE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z][a-z.,!?()'’\-]+|of|for|and)\s+").unwrap());

/// What must follow a title: another capitalised word, or a house number.
static RE_TITLE_NEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z][a-z.!?()'\-]+\s|\d)").unwrap());

static RE_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)(\d{1,5}\s[\w\s.\-]+?(?:,\s*[\w\s.\-]+?){0,2},\s*\w{1,4}\.?\s\d{5})\b")
        .unwrap()
});

static RE_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\d{3}-\d{3}-\d{4})+").unwrap());

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// The extracted fields of one paragraph. Absent fields are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTuple {
    pub title: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub description: String,
}

impl FieldTuple {
    /// No title and no description: nothing identifies the entry.
    pub fn is_malformed(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Address => &mut self.address,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
        }
    }
}

/// A field claimed by pattern, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Address,
    Phone,
    Email,
}

impl Field {
    pub const ORDER: [Field; 4] = [Field::Title, Field::Address, Field::Phone, Field::Email];

    /// Byte span of this field's first match in `residual`.
    pub fn locate(self, residual: &str) -> Option<Range<usize>> {
        match self {
            Field::Title => locate_title(residual),
            Field::Address => RE_ADDRESS
                .captures(residual)
                .and_then(|caps| caps.get(1))
                .map(|m| m.range()),
            Field::Phone => RE_PHONE.find(residual).map(|m| m.range()),
            Field::Email => RE_EMAIL.find(residual).map(|m| m.range()),
        }
    }

    /// Claim this field from `residual`, returning the normalised value and
    /// the text left for the next step. No match leaves the residual as is.
    pub fn take(self, residual: &str) -> (String, String) {
        match self.locate(residual) {
            Some(span) => {
                let value = normalise(&residual[span.clone()]);
                let rest = format!("{} {}", &residual[..span.start], &residual[span.end..]);
                (value, rest)
            }
            None => (String::new(), residual.to_string()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Address => "address",
            Field::Phone => "phone",
            Field::Email => "email",
        };
        f.write_str(name)
    }
}

/// Extract the five fields of `paragraph`. Total: never fails, and the
/// description is always present (possibly empty).
pub fn extract_fields(paragraph: &str) -> FieldTuple {
    let (mut fields, residual) = Field::ORDER.into_iter().fold(
        (FieldTuple::default(), paragraph.to_string()),
        |(mut fields, residual), field| {
            let (value, rest) = field.take(&residual);
            *fields.slot_mut(field) = value;
            (fields, rest)
        },
    );
    fields.description = normalise(&residual);
    fields
}

/// Longest leading run of title words that is followed by another
/// capitalised word or a digit.
fn locate_title(text: &str) -> Option<Range<usize>> {
    let mut word_ends = Vec::new();
    let mut pos = 0;
    while let Some(m) = RE_TITLE_WORD.find(&text[pos..]) {
        pos += m.end();
        word_ends.push(pos);
    }

    word_ends
        .into_iter()
        .rev()
        .find(|&end| RE_TITLE_NEXT.is_match(&text[end..]))
        .map(|end| 0..end)
}

fn normalise(value: &str) -> String {
    value.trim().replace('\n', " ").replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "Example Org\n123 Main St, Springfield, IL 62704\n217-555-0100\ncontact@example.org\nWe provide free meals.\n";

    #[test]
    fn full_entry() {
        let f = extract_fields(EXAMPLE);
        assert_eq!(f.title, "Example Org");
        assert_eq!(f.address, "123 Main St. Springfield. IL 62704");
        assert_eq!(f.phone, "217-555-0100");
        assert_eq!(f.email, "contact@example.org");
        assert_eq!(f.description, "We provide free meals.");
    }

    #[test]
    fn missing_phone_leaves_other_fields_alone() {
        let text = "Example Org\n123 Main St, Springfield, IL 62704\ncontact@example.org\nWe provide free meals.\n";
        let f = extract_fields(text);
        assert_eq!(f.phone, "");
        assert_eq!(f.title, "Example Org");
        assert_eq!(f.address, "123 Main St. Springfield. IL 62704");
        assert_eq!(f.email, "contact@example.org");
        assert_eq!(f.description, "We provide free meals.");
    }

    #[test]
    fn title_needs_a_following_word() {
        // "Org" is the last title word because "We" is followed by lowercase.
        let f = extract_fields("Example Org\nWe provide meals\nto all\nresidents.");
        assert_eq!(f.title, "Example Org");
        assert_eq!(f.description, "We provide meals to all residents.");
    }

    #[test]
    fn connectives_join_title_words() {
        let f = extract_fields("Friends of the Library\n12 Oak St, Tampa, FL 33602\n");
        // "the" is lowercase, so the run stops after "of".
        assert_eq!(f.title, "");
        let f = extract_fields("Friends of Children and Families\n12 Oak St, Tampa, FL 33602\n");
        assert_eq!(f.title, "Friends of Children and Families");
        assert_eq!(f.address, "12 Oak St. Tampa. FL 33602");
    }

    #[test]
    fn no_title_when_paragraph_starts_lowercase() {
        let f = extract_fields("serving seniors\n813-555-0142\nCall ahead.");
        assert_eq!(f.title, "");
        assert_eq!(f.phone, "813-555-0142");
        assert_eq!(f.description, "serving seniors   Call ahead.");
    }

    #[test]
    fn empty_paragraph_yields_empty_fields() {
        let f = extract_fields("");
        assert_eq!(f, FieldTuple::default());
        assert!(f.is_malformed());
    }

    #[test]
    fn contact_only_entry_is_malformed() {
        let f = extract_fields("813-555-0142\ninfo@example.org");
        assert!(f.is_malformed());
        assert_eq!(f.phone, "813-555-0142");
        assert_eq!(f.email, "info@example.org");
    }

    #[test]
    fn claimed_spans_do_not_overlap() {
        let mut residual = EXAMPLE.to_string();
        let mut claimed = Vec::new();
        for field in Field::ORDER {
            let (value, rest) = field.take(&residual);
            assert!(!value.is_empty(), "{field} not found");
            residual = rest;
            claimed.push(value);
        }
        for (i, a) in claimed.iter().enumerate() {
            for b in claimed.iter().skip(i + 1) {
                assert!(!a.contains(b.as_str()) && !b.contains(a.as_str()));
            }
        }
        assert!(!residual.contains("Example"));
        assert!(!residual.contains("62704"));
    }

    #[test]
    fn take_without_match_keeps_residual() {
        let (value, rest) = Field::Email.take("no address here");
        assert_eq!(value, "");
        assert_eq!(rest, "no address here");
    }

    #[test]
    fn address_with_two_line_street() {
        let text = "Safe Harbor Shelter\n9 Elm St\nSuite 4, Springfield, IL 62702\nBeds.";
        let f = extract_fields(text);
        assert_eq!(f.title, "Safe Harbor Shelter");
        assert_eq!(f.address, "9 Elm St Suite 4. Springfield. IL 62702");
        assert_eq!(f.description, "Beds.");
    }

    #[test]
    fn commas_in_description_become_periods() {
        let f = extract_fields("Example Org\nWe offer food, clothing, and shelter\nfor families\nin need.");
        assert_eq!(f.title, "Example Org");
        assert_eq!(
            f.description,
            "We offer food. clothing. and shelter for families in need."
        );
    }

    #[test]
    fn title_word_with_comma_cannot_lead_the_next_word() {
        // "Food," ends in a comma, which the follow-up word may not contain.
        let f = extract_fields("Example Org\nFood, clothing\nand more\nhere");
        assert_eq!(f.title, "Example");
    }
}

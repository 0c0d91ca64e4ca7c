//! CSV serialisation in the directory's fixed row format.
//!
//! Every field, including the last, is followed by a comma. Fields are
//! never quoted: extracted values have their commas replaced with periods
//! upstream, and category labels cannot contain commas.

use crate::output::Record;
use std::io::{self, Write};

/// Header row, terminated like every data row.
pub const CSV_HEADER: &str = "title, category, address, phone, email, description,\n";

/// Format one record as `t, c, a, p, e, d,\n`.
pub fn format_row(record: &Record) -> String {
    format!(
        "{}, {}, {}, {}, {}, {},\n",
        record.title,
        record.category,
        record.address,
        record.phone,
        record.email,
        record.description
    )
}

/// Render the header and all rows to a string.
pub fn render_csv(records: &[Record]) -> String {
    records
        .iter()
        .fold(String::from(CSV_HEADER), |mut csv, record| {
            csv.push_str(&format_row(record));
            csv
        })
}

/// Write the header and all rows to `out`.
pub fn write_csv<W: Write>(mut out: W, records: &[Record]) -> io::Result<()> {
    out.write_all(CSV_HEADER.as_bytes())?;
    for record in records {
        out.write_all(format_row(record).as_bytes())?;
    }
    out.flush()
}

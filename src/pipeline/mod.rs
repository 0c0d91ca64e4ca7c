//! Pipeline stages for directory-to-CSV extraction.
//!
//! Each submodule implements one transformation step, so every stage can be
//! tested on plain strings and the renderer can be swapped out.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ segment ──▶ split ──▶ paragraph ──▶ fields ──▶ write
//! (path)    (pdfium)   (labels)    (blocks)  (entries)     (5-tuple)  (CSV)
//! ```
//!
//! 1. [`input`]     : check the path exists and carries the `%PDF` magic
//! 2. [`render`]    : concatenate page text for the selected range
//! 3. [`segment`]   : find all-caps category headers
//! 4. [`split`]     : cut the text into one block per header
//! 5. [`paragraph`] : split blocks into entries and drop the noise
//! 6. [`fields`]    : claim title, address, phone and email in order
//! 7. [`write`]     : emit the fixed trailing-comma row format

pub mod fields;
pub mod input;
pub mod paragraph;
pub mod render;
pub mod segment;
pub mod split;
pub mod write;

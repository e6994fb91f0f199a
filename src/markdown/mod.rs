//! Markdown normalization for export.
//!
//! Section bodies arrive as markdown-flavored text. None of the output formats
//! render markdown, so every exporter first flattens the body through the same
//! fixed pipeline:
//!
//! - [`normalize`]: ordered substitution passes that strip a small, fixed set
//!   of syntax (headings, emphasis, inline code, links, list markers)
//! - [`paragraphs`]: normalization followed by paragraph splitting
//!
//! This is not a markdown parser. Tables, block quotes, and
//! nested lists pass through as plain text.

mod normalize;

pub use normalize::{BULLET, normalize, paragraphs, split_paragraphs};

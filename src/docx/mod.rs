//! Structured word-processor output (Office Open XML).
//!
//! The document is assembled in memory as a list of [`Block`] nodes by
//! [`structure`], independent of page geometry, and then serialized into a
//! ZIP package by [`write_package`]. The consuming application paginates.

mod node;
mod structure;
mod writer;

pub use node::{Alignment, Block, DocxDocument, Paragraph, ParagraphStyle, Run};
pub use structure::structure;
pub use writer::{core_xml, document_xml, write_package};

//! # folio
//!
//! Render long-form AI-authored projects into PDF, DOCX, and plain text.
//!
//! ## Features
//!
//! - Paginated PDF output with measured line wrapping and automatic page breaks
//! - Structured DOCX output with real Title and Heading 1 styles
//! - Plain-text output with markdown syntax flattened away
//! - Filesystem-safe filenames derived from the project title
//!
//! ## Quick Start
//!
//! ```
//! use folio::{Format, Project, Section, export};
//!
//! let project = Project::new("Field Notes")
//!     .with_section(Section::new("Morning", "Fog over the **harbor**."))
//!     .with_section(Section::new("Evening", ""));
//!
//! let artifact = export(&project, Format::Pdf)?;
//! assert_eq!(artifact.filename, "field_notes.pdf");
//! assert!(artifact.bytes.starts_with(b"%PDF-"));
//! # Ok::<(), folio::Error>(())
//! ```
//!
//! Sections with empty bodies are skipped, but the remaining ones keep their
//! original position number, so the example above produces a single
//! `1. Morning` heading.
//!
//! ## Loading Projects
//!
//! Projects produced by the authoring side arrive as JSON:
//!
//! ```
//! use folio::Project;
//!
//! let json = r#"{
//!     "title": "Notes",
//!     "wordCount": 1200,
//!     "createdAt": "2024-03-05T12:00:00Z",
//!     "settings": { "format": "report", "style": "formal", "tone": "neutral", "targetLength": "short" },
//!     "sections": [{ "title": "Intro", "content": "Hello." }]
//! }"#;
//! let project = Project::from_json(json)?;
//! assert_eq!(project.estimated_pages(), 5);
//! # Ok::<(), folio::Error>(())
//! ```

pub mod docx;
pub mod error;
pub mod export;
pub mod markdown;
pub mod model;
pub mod pdf;

/// Attribution line written into every export.
pub const GENERATOR: &str = "Generated by Folio";

/// Application name recorded in document metadata.
pub const CREATOR: &str = "Folio";

pub use error::{Error, Result};
pub use export::{Artifact, ExportOptions, Exporter, Format, export, export_all, export_with};
pub use model::{ExportSettings, Project, Section};

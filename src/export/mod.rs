//! Export module for rendering projects to output formats.
//!
//! Provides the `Exporter` trait, the three format implementations, and the
//! [`export`] orchestrator that turns a project into a named [`Artifact`].
//!
//! # Architecture
//!
//! The `Exporter` trait uses a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` writes to any `Write + Seek` destination
//!
//! Every exporter renders completely in memory before touching the
//! destination, so a failed export never leaves a partial file behind.
//!
//! # Example
//!
//! ```
//! use folio::{Format, Project, Section, export};
//!
//! let project = Project::new("Quarterly Review")
//!     .with_section(Section::new("Summary", "Revenue grew."));
//!
//! let artifact = export(&project, Format::Text)?;
//! assert_eq!(artifact.filename, "quarterly_review.txt");
//! # Ok::<(), folio::Error>(())
//! ```

use std::fmt;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Project;

mod docx;
mod filename;
mod pdf;
mod text;

pub use docx::{DocxConfig, DocxExporter};
pub use filename::sanitize_filename;
pub use pdf::PdfExporter;
pub use text::{TextConfig, TextExporter};

pub use crate::pdf::{PageSize, PdfConfig};

/// Default strftime pattern for the created date (US short date).
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Trait for exporting projects to specific formats.
///
/// Exporters use a builder pattern where configuration is held in the struct,
/// and the `export` method writes to any `Write + Seek` destination.
pub trait Exporter {
    /// Export the project to the provided writer.
    ///
    /// The writer can be:
    /// - `std::fs::File` for disk output
    /// - `std::io::Cursor<Vec<u8>>` for in-memory output
    /// - Any other type implementing `Write + Seek`
    fn export<W: Write + Seek>(&self, project: &Project, writer: &mut W) -> Result<()>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Fixed-size pages (PDF).
    Pdf,
    /// Word-processor document (DOCX).
    Docx,
    /// Plain UTF-8 text.
    #[serde(rename = "txt", alias = "text")]
    Text,
}

impl Format {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Docx => "docx",
            Format::Text => "txt",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Format::Pdf => "application/pdf",
            Format::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Format::Text => "text/plain; charset=utf-8",
        }
    }

    /// Every format, in export order.
    pub fn all() -> [Format; 3] {
        [Format::Pdf, Format::Docx, Format::Text]
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" | "page" => Ok(Format::Pdf),
            "docx" | "structured" => Ok(Format::Docx),
            "txt" | "text" => Ok(Format::Text),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered export: payload plus the filename it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub format: Format,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    /// Write the artifact into `dir` under its filename.
    ///
    /// I/O failures are returned unchanged; nothing is retried.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        fs::write(&path, &self.bytes)?;
        tracing::debug!(path = %path.display(), bytes = self.bytes.len(), "saved artifact");
        Ok(path)
    }
}

/// Configuration for every format, plus the shared date pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub pdf: PdfConfig,
    pub docx: DocxConfig,
    pub text: TextConfig,
    /// strftime pattern used to render `createdAt`.
    pub date_format: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pdf: PdfConfig::default(),
            docx: DocxConfig::default(),
            text: TextConfig::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Export a project with default options.
pub fn export(project: &Project, format: Format) -> Result<Artifact> {
    export_with(project, format, &ExportOptions::default())
}

/// Export a project with explicit options.
///
/// The project is validated, the matching exporter runs exactly once, and
/// its error is returned as-is. No other format is tried on failure.
pub fn export_with(project: &Project, format: Format, options: &ExportOptions) -> Result<Artifact> {
    project.validate()?;
    tracing::debug!(title = %project.title, %format, "exporting project");

    let bytes = match format {
        Format::Pdf => PdfExporter::new()
            .with_config(options.pdf.clone())
            .with_date_format(options.date_format.as_str())
            .render(project)?,
        Format::Docx => DocxExporter::new()
            .with_config(options.docx.clone())
            .with_date_format(options.date_format.as_str())
            .render(project)?,
        Format::Text => TextExporter::new()
            .with_config(options.text.clone())
            .with_date_format(options.date_format.as_str())
            .render(project)
            .into_bytes(),
    };

    let filename = format!("{}.{}", sanitize_filename(&project.title), format.extension());
    tracing::debug!(%filename, bytes = bytes.len(), "export finished");

    Ok(Artifact {
        format,
        filename,
        bytes,
    })
}

/// Export every format in order, stopping at the first failure.
pub fn export_all(project: &Project) -> Result<Vec<Artifact>> {
    Format::all()
        .into_iter()
        .map(|format| export(project, format))
        .collect()
}

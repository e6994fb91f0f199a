//! PDF exporter.

use std::io::{Seek, Write};

use crate::error::{Error, Result};
use crate::model::Project;
use crate::pdf::{PdfConfig, render_pdf};

use super::{DEFAULT_DATE_FORMAT, Exporter};

/// Page-stream exporter.
///
/// # Example
///
/// ```
/// use folio::export::{Exporter, PdfExporter};
/// use folio::{Project, Section};
///
/// let project = Project::new("Notes").with_section(Section::new("One", "Hello."));
/// let mut out = std::io::Cursor::new(Vec::new());
/// PdfExporter::new().export(&project, &mut out)?;
/// assert!(out.get_ref().starts_with(b"%PDF-"));
/// # Ok::<(), folio::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PdfExporter {
    config: PdfConfig,
    date_format: String,
}

impl PdfExporter {
    pub fn new() -> Self {
        Self {
            config: PdfConfig::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_config(mut self, config: PdfConfig) -> Self {
        self.config = config;
        self
    }

    /// strftime pattern for the created date.
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    /// Render the whole file in memory.
    ///
    /// Any failure in layout or serialization becomes [`Error::Pdf`].
    pub fn render(&self, project: &Project) -> Result<Vec<u8>> {
        render_pdf(project, &self.config, &self.date_format).map_err(|e| Error::Pdf(e.to_string()))
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for PdfExporter {
    fn export<W: Write + Seek>(&self, project: &Project, writer: &mut W) -> Result<()> {
        let bytes = self.render(project)?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

//! DOCX exporter.

use std::io::{Cursor, Seek, Write};

use serde::{Deserialize, Serialize};

use crate::docx::{structure, write_package};
use crate::error::Result;
use crate::model::Project;

use super::{DEFAULT_DATE_FORMAT, Exporter};

/// Configuration for DOCX export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocxConfig {
    /// Deflate level for package parts (0-9).
    pub compression_level: u32,
}

impl Default for DocxConfig {
    fn default() -> Self {
        Self {
            compression_level: 6,
        }
    }
}

/// Structured word-processor exporter.
///
/// The block tree is built first, then the whole package is serialized into
/// memory; the destination writer only ever sees a complete file.
#[derive(Debug, Clone)]
pub struct DocxExporter {
    config: DocxConfig,
    date_format: String,
}

impl DocxExporter {
    pub fn new() -> Self {
        Self {
            config: DocxConfig::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_config(mut self, config: DocxConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    /// Build and serialize the package in memory.
    ///
    /// Failures in node assembly or packaging become [`crate::Error::Docx`]
    /// carrying the lower-level message.
    pub fn render(&self, project: &Project) -> Result<Vec<u8>> {
        let doc = structure(project, &self.date_format);
        tracing::debug!(blocks = doc.blocks.len(), "built document tree");

        let mut buf = Cursor::new(Vec::new());
        let level = self.config.compression_level.min(9);
        write_package(&doc, project.created_at, level, &mut buf)?;
        Ok(buf.into_inner())
    }
}

impl Default for DocxExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for DocxExporter {
    fn export<W: Write + Seek>(&self, project: &Project, writer: &mut W) -> Result<()> {
        let bytes = self.render(project)?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

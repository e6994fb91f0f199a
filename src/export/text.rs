//! Plain-text exporter.
//!
//! Produces a flat UTF-8 document: a header block closed by an `=` banner,
//! then each emitted section as a numbered title line, its normalized body
//! (paragraphs separated by blank lines, not re-wrapped), and a `-`
//! separator.

use std::fmt::Write as _;
use std::io::{Seek, Write};

use serde::{Deserialize, Serialize};

use crate::GENERATOR;
use crate::error::Result;
use crate::markdown::normalize;
use crate::model::{Project, format_count};

use super::{DEFAULT_DATE_FORMAT, Exporter};

/// Configuration for plain-text export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Width of the `=` banner closing the header.
    pub banner_width: usize,
    /// Width of the `-` line after each section.
    pub separator_width: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            banner_width: 80,
            separator_width: 60,
        }
    }
}

/// Exporter for plain-text output.
#[derive(Debug, Clone)]
pub struct TextExporter {
    config: TextConfig,
    date_format: String,
}

impl TextExporter {
    pub fn new() -> Self {
        Self {
            config: TextConfig::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_config(mut self, config: TextConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    /// Render the project to a string.
    pub fn render(&self, project: &Project) -> String {
        let mut out = String::new();
        let settings = &project.settings;

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}", project.title);
        let _ = writeln!(out, "{GENERATOR}");
        let _ = writeln!(out, "Created: {}", project.created_date(&self.date_format));
        let _ = writeln!(out, "Word Count: {}", format_count(project.word_count));
        let _ = writeln!(out, "Estimated Pages: {}", project.estimated_pages());
        let _ = writeln!(
            out,
            "Format: {} | Style: {} | Tone: {} | Target Length: {}",
            settings.format, settings.style, settings.tone, settings.target_length
        );
        let _ = writeln!(out, "{}", "=".repeat(self.config.banner_width));
        out.push('\n');

        let separator = "-".repeat(self.config.separator_width);
        for (ordinal, section) in project.emitted_sections() {
            let _ = writeln!(out, "{ordinal}. {}", section.title);
            out.push('\n');
            out.push_str(&normalize(&section.content));
            out.push_str("\n\n");
            out.push_str(&separator);
            out.push_str("\n\n");
        }

        out
    }
}

impl Default for TextExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for TextExporter {
    fn export<W: Write + Seek>(&self, project: &Project, writer: &mut W) -> Result<()> {
        writer.write_all(self.render(project).as_bytes())?;
        Ok(())
    }
}

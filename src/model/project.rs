//! The write-up document consumed by every exporter.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::DEFAULT_DATE_FORMAT;

/// Words per printed page used for the page-count estimate.
pub const WORDS_PER_PAGE: usize = 250;

/// Generation settings shown in each output's header.
///
/// The descriptive fields are free-form strings; they are rendered verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    pub target_length: String,
    pub style: String,
    pub tone: String,
    pub format: String,
    /// Carried for forward compatibility; no renderer reads it yet.
    pub include_references: bool,
}

impl ExportSettings {
    pub fn new(
        format: impl Into<String>,
        style: impl Into<String>,
        tone: impl Into<String>,
        target_length: impl Into<String>,
    ) -> Self {
        Self {
            target_length: target_length.into(),
            style: style.into(),
            tone: tone.into(),
            format: format.into(),
            include_references: false,
        }
    }

    pub fn with_references(mut self, include: bool) -> Self {
        self.include_references = include;
        self
    }
}

/// One titled unit of content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    /// Markdown-flavored body text. May be empty.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_provider: Option<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            title: title.into(),
            word_count: content.split_whitespace().count(),
            content,
            model: None,
            model_provider: None,
        }
    }

    pub fn with_model(mut self, provider: impl Into<String>, model: impl Into<String>) -> Self {
        self.model_provider = Some(provider.into());
        self.model = Some(model.into());
        self
    }

    /// A section produces output iff its trimmed content is non-empty.
    pub fn is_emitted(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// A complete write-up document.
///
/// Exporters only ever borrow a `Project`; it is never mutated during export,
/// so the same value can be rendered to several formats concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub sections: Vec<Section>,
    /// Precomputed total word count. Trusted as given.
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub settings: ExportSettings,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created_at: Utc::now(),
            ..Default::default()
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = word_count;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Load a project from the authoring subsystem's JSON representation.
    ///
    /// Syntax errors surface as [`Error::Json`]; well-formed JSON with a
    /// missing or mistyped field (for example, no `sections`) surfaces as
    /// [`Error::InvalidProject`].
    pub fn from_json(json: &str) -> Result<Self> {
        let project: Project = serde_json::from_str(json).map_err(|e| match e.classify() {
            serde_json::error::Category::Data => Error::InvalidProject(e.to_string()),
            _ => Error::Json(e),
        })?;
        project.validate()?;
        Ok(project)
    }

    /// Fail fast on values that would render a corrupt artifact.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidProject("project title is empty".to_string()));
        }
        if let Some(index) = self.sections.iter().position(|s| s.title.trim().is_empty()) {
            return Err(Error::InvalidProject(format!(
                "section {} has an empty title",
                index + 1
            )));
        }
        Ok(())
    }

    /// Estimated printed page count: `round(word_count / 250)`.
    pub fn estimated_pages(&self) -> usize {
        (self.word_count as f64 / WORDS_PER_PAGE as f64).round() as usize
    }

    /// Sections that produce output, paired with their positional ordinal.
    ///
    /// The ordinal is the original index + 1, so a skipped empty section
    /// still consumes its number.
    pub fn emitted_sections(&self) -> impl Iterator<Item = (usize, &Section)> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, section)| section.is_emitted())
            .map(|(i, section)| (i + 1, section))
    }

    /// Render the creation timestamp with a strftime pattern.
    ///
    /// An invalid pattern falls back to the default US short date.
    pub fn created_date(&self, pattern: &str) -> String {
        let mut out = String::new();
        if write!(out, "{}", self.created_at.format(pattern)).is_err() {
            out.clear();
            let _ = write!(out, "{}", self.created_at.format(DEFAULT_DATE_FORMAT));
        }
        out
    }
}

/// Format a count with comma thousands separators (`12345` → `12,345`).
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

//! Block nodes of a word-processor document.
//!
//! The tree is flat: a document is an ordered list of [`Block`]s, each either
//! a styled paragraph of runs or an explicit page break. Pagination beyond
//! that is left to the consuming application.

/// Named paragraph style, defined in `word/styles.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Title,
    Heading1,
    Normal,
}

impl ParagraphStyle {
    pub fn style_id(self) -> &'static str {
        match self {
            ParagraphStyle::Title => "Title",
            ParagraphStyle::Heading1 => "Heading1",
            ParagraphStyle::Normal => "Normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// A run of uniformly formatted text. Newlines become line breaks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    /// Font size in half-points (`w:sz`).
    pub size: Option<u32>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set the size in points.
    pub fn size_pt(mut self, points: u32) -> Self {
        self.size = Some(points * 2);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub alignment: Alignment,
    pub runs: Vec<Run>,
    /// Space after the paragraph in twentieths of a point.
    pub spacing_after: Option<u32>,
}

impl Paragraph {
    pub fn new(style: ParagraphStyle) -> Self {
        Self {
            style,
            alignment: Alignment::Left,
            runs: Vec::new(),
            spacing_after: None,
        }
    }

    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }

    pub fn with_spacing_after(mut self, twips: u32) -> Self {
        self.spacing_after = Some(twips);
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    PageBreak,
}

/// A complete structured document plus its package metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxDocument {
    pub title: String,
    pub description: String,
    pub creator: String,
    pub blocks: Vec<Block>,
}

impl DocxDocument {
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::PageBreak => None,
        })
    }

    /// Text of every heading paragraph, in document order.
    pub fn headings(&self) -> Vec<String> {
        self.paragraphs()
            .filter(|p| p.style == ParagraphStyle::Heading1)
            .map(Paragraph::text)
            .collect()
    }
}

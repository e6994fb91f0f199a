//! Manual pagination for the page-stream format.
//!
//! [`Layout`] owns a vertical cursor and a growing list of pages. Every
//! writable unit (line, rule) first calls [`Layout::ensure_space`], which
//! starts a new page when the unit would cross the bottom margin, so nothing
//! is ever clipped at a page boundary. All state is local to one `Layout`
//! value; concurrent exports each build their own.

use crate::markdown::paragraphs;
use crate::model::{Project, Section, format_count};

use crate::GENERATOR;

use super::PdfConfig;
use super::font::{Font, PT_TO_MM, text_width};

/// Gap between the title and the metadata block, in millimetres.
const TITLE_GAP: f32 = 6.0;
/// Gap between metadata groups.
const META_GAP: f32 = 4.0;
/// Gap between a section heading and its first paragraph.
const HEADING_GAP: f32 = 3.0;
/// Gap after each paragraph.
const PARAGRAPH_GAP: f32 = 4.0;
/// Gaps around the rule that closes a section.
const SEPARATOR_BEFORE: f32 = 2.0;
const SEPARATOR_AFTER: f32 = 8.0;

const TITLE_RULE: f32 = 0.5;
const SECTION_RULE: f32 = 0.2;

/// Fraction of the line height between the line top and its baseline.
const BASELINE_RATIO: f32 = 0.78;

/// Horizontal placement of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A positioned line of text. Coordinates are millimetres from the top-left
/// corner of the page; `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub x: f32,
    pub y: f32,
    pub font: Font,
    pub size: f32,
    pub text: String,
}

/// A horizontal rule from `x1` to `x2` at height `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOp {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    Rule(RuleOp),
}

/// One fixed-size page and everything drawn on it, in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text lines on this page, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t.text.as_str()),
            DrawOp::Rule(_) => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            DrawOp::Rule(_) => None,
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &RuleOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Rule(r) => Some(r),
            DrawOp::Text(_) => None,
        })
    }
}

/// Wrap a paragraph into lines no wider than `max_width` millimetres.
///
/// Breaks only at ASCII whitespace, so a no-break space (U+00A0) keeps
/// its neighbours on one line. Embedded newlines are hard breaks. A single
/// word wider than the line is placed alone on its own line rather than
/// being split.
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for hard_line in text.split('\n') {
        let mut current = String::new();
        for word in hard_line.split_ascii_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if text_width(&candidate, font, size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Per-call pagination context.
pub struct Layout<'a> {
    config: &'a PdfConfig,
    width: f32,
    height: f32,
    pages: Vec<Page>,
    y: f32,
}

impl<'a> Layout<'a> {
    /// Start a layout with one empty page and the cursor at the top margin.
    pub fn new(config: &'a PdfConfig) -> Self {
        let (width, height) = config.page_size.dimensions();
        Self {
            config,
            width,
            height,
            pages: vec![Page::default()],
            y: config.margin,
        }
    }

    /// Current vertical cursor, millimetres from the top of the page.
    pub fn cursor(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Usable width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.config.margin
    }

    fn bottom_limit(&self) -> f32 {
        self.height - self.config.margin
    }

    /// Height one line occupies at `size` points.
    pub fn line_height(&self, size: f32) -> f32 {
        size * self.config.line_height * PT_TO_MM
    }

    /// Break to a new page if `required` millimetres would cross the bottom
    /// margin. Returns whether a break happened.
    ///
    /// A page that has nothing on it yet is never abandoned, so a unit taller
    /// than the whole content area is written once instead of looping.
    pub fn ensure_space(&mut self, required: f32) -> bool {
        if self.y + required > self.bottom_limit() && self.y > self.config.margin {
            self.new_page();
            true
        } else {
            false
        }
    }

    /// Unconditionally start a new page and reset the cursor.
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.config.margin;
    }

    /// Move the cursor down without drawing.
    pub fn advance(&mut self, mm: f32) {
        self.y += mm;
    }

    fn current_page(&mut self) -> &mut Page {
        // `new` always seeds one page.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Write a single pre-wrapped line.
    pub fn write_line(&mut self, text: &str, font: Font, size: f32, align: Align) {
        let height = self.line_height(size);
        self.ensure_space(height);

        let x = match align {
            Align::Left => self.config.margin,
            Align::Center => (self.width - text_width(text, font, size)) / 2.0,
        };
        let op = TextOp {
            x,
            y: self.y + height * BASELINE_RATIO,
            font,
            size,
            text: text.to_string(),
        };
        self.current_page().ops.push(DrawOp::Text(op));
        self.y += height;
    }

    /// Wrap `text` to the content width and write each resulting line.
    pub fn write_wrapped(&mut self, text: &str, font: Font, size: f32, align: Align) {
        let width = self.content_width();
        for line in wrap_text(text, font, size, width) {
            self.write_line(&line, font, size, align);
        }
    }

    /// Draw a full-width horizontal rule at the cursor.
    pub fn write_rule(&mut self, thickness: f32) {
        self.ensure_space(thickness);
        let op = RuleOp {
            x1: self.config.margin,
            x2: self.width - self.config.margin,
            y: self.y,
            thickness,
        };
        self.current_page().ops.push(DrawOp::Rule(op));
        self.y += thickness;
    }

    /// Title page: centered title, metadata, settings, and a closing rule.
    ///
    /// Always ends by starting a fresh page, so section content never shares
    /// the title page.
    pub fn write_title_block(&mut self, project: &Project, date_format: &str) {
        let cfg = self.config;

        self.write_wrapped(&project.title, Font::HelveticaBold, cfg.title_size, Align::Center);
        self.advance(TITLE_GAP);

        let meta = [
            GENERATOR.to_string(),
            format!("Created: {}", project.created_date(date_format)),
            format!("Word Count: {}", format_count(project.word_count)),
            format!("Estimated Pages: {}", project.estimated_pages()),
        ];
        for line in &meta {
            self.write_wrapped(line, Font::Helvetica, cfg.meta_size, Align::Center);
        }
        self.advance(META_GAP);

        let settings = &project.settings;
        let summary = [
            format!("Format: {}", settings.format),
            format!("Style: {}", settings.style),
            format!("Tone: {}", settings.tone),
            format!("Target Length: {}", settings.target_length),
        ];
        for line in &summary {
            self.write_wrapped(line, Font::Helvetica, cfg.body_size, Align::Center);
        }
        self.advance(TITLE_GAP);

        self.write_rule(TITLE_RULE);
        self.new_page();
    }

    /// Numbered heading, wrapped paragraphs, and a closing separator.
    pub fn write_section(&mut self, ordinal: usize, section: &Section) {
        let cfg = self.config;

        let heading = format!("{ordinal}. {}", section.title);
        self.write_wrapped(&heading, Font::HelveticaBold, cfg.heading_size, Align::Left);
        self.advance(HEADING_GAP);

        for paragraph in paragraphs(&section.content) {
            self.write_wrapped(&paragraph, Font::Helvetica, cfg.body_size, Align::Left);
            self.advance(PARAGRAPH_GAP);
        }

        self.advance(SEPARATOR_BEFORE);
        self.write_rule(SECTION_RULE);
        self.advance(SEPARATOR_AFTER);
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}

/// Lay out a whole project: title page, then every emitted section.
pub fn layout_project(project: &Project, config: &PdfConfig, date_format: &str) -> Vec<Page> {
    let mut layout = Layout::new(config);
    layout.write_title_block(project, date_format);
    for (ordinal, section) in project.emitted_sections() {
        layout.write_section(ordinal, section);
    }
    layout.finish()
}

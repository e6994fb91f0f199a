//! Project → structured block tree.

use crate::markdown::paragraphs;
use crate::model::{Project, format_count};
use crate::{CREATOR, GENERATOR};

use super::node::{Block, DocxDocument, Paragraph, ParagraphStyle, Run};

const TITLE_PT: u32 = 32;
const META_PT: u32 = 12;
const HEADING_PT: u32 = 16;
const BODY_PT: u32 = 11;

const TITLE_SPACING: u32 = 400;
const META_SPACING: u32 = 120;
const HEADING_SPACING: u32 = 200;
const BODY_SPACING: u32 = 200;

/// Build the block tree for `project`.
///
/// Order: centered title, attribution, created date, word/page counts,
/// settings summary, a page break, then per emitted section a heading, its
/// paragraphs, and an empty spacer paragraph. The page break is emitted even
/// when the title block happens to end at a page boundary.
pub fn structure(project: &Project, date_format: &str) -> DocxDocument {
    let mut blocks = Vec::new();

    blocks.push(Block::Paragraph(
        Paragraph::new(ParagraphStyle::Title)
            .centered()
            .with_spacing_after(TITLE_SPACING)
            .with_run(Run::new(&project.title).bold().size_pt(TITLE_PT)),
    ));

    let settings = &project.settings;
    let meta = [
        GENERATOR.to_string(),
        format!("Created: {}", project.created_date(date_format)),
        format!(
            "Word Count: {} | Estimated Pages: {}",
            format_count(project.word_count),
            project.estimated_pages()
        ),
        format!(
            "Format: {} | Style: {} | Tone: {}",
            settings.format, settings.style, settings.tone
        ),
    ];
    for line in meta {
        blocks.push(Block::Paragraph(
            Paragraph::new(ParagraphStyle::Normal)
                .centered()
                .with_spacing_after(META_SPACING)
                .with_run(Run::new(line).size_pt(META_PT)),
        ));
    }

    blocks.push(Block::PageBreak);

    for (ordinal, section) in project.emitted_sections() {
        blocks.push(Block::Paragraph(
            Paragraph::new(ParagraphStyle::Heading1)
                .with_spacing_after(HEADING_SPACING)
                .with_run(
                    Run::new(format!("{ordinal}. {}", section.title))
                        .bold()
                        .size_pt(HEADING_PT),
                ),
        ));

        for text in paragraphs(&section.content) {
            blocks.push(Block::Paragraph(
                Paragraph::new(ParagraphStyle::Normal)
                    .with_spacing_after(BODY_SPACING)
                    .with_run(Run::new(text).size_pt(BODY_PT)),
            ));
        }

        blocks.push(Block::Paragraph(Paragraph::new(ParagraphStyle::Normal)));
    }

    tracing::trace!(blocks = blocks.len(), "structured document");

    DocxDocument {
        title: project.title.clone(),
        description: GENERATOR.to_string(),
        creator: CREATOR.to_string(),
        blocks,
    }
}

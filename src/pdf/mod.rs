//! Paginated page-stream output.
//!
//! Rendering happens in two stages:
//!
//! - [`layout`]: measures and wraps text, tracks the vertical cursor, and
//!   inserts page breaks, producing a display list of [`Page`]s
//! - [`writer`]: serializes that display list into PDF bytes
//!
//! Geometry is expressed in millimetres and font sizes in points, the way a
//! print stylesheet would describe the page.

mod font;
mod layout;
mod writer;

use serde::{Deserialize, Serialize};

use crate::CREATOR;
use crate::model::Project;

pub use font::{Font, PT_TO_MM, encode_win_ansi, text_width};
pub use layout::{Align, DrawOp, Layout, Page, RuleOp, TextOp, layout_project, wrap_text};
pub use writer::{DocumentInfo, PdfWriter};

/// Physical page size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// 210 × 297 mm.
    #[default]
    A4,
    /// 215.9 × 279.4 mm.
    Letter,
    /// Arbitrary size in millimetres.
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Width and height in millimetres.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Custom { width, height } => (width, height),
        }
    }
}

/// Page geometry and typography for the page-stream format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub page_size: PageSize,
    /// Margin on all four sides, in millimetres.
    pub margin: f32,
    pub title_size: f32,
    pub heading_size: f32,
    pub meta_size: f32,
    pub body_size: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Flate-compress page content streams.
    pub compress: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin: 20.0,
            title_size: 24.0,
            heading_size: 16.0,
            meta_size: 12.0,
            body_size: 11.0,
            line_height: 1.15,
            compress: true,
        }
    }
}

/// Lay out and serialize `project` into a complete PDF file.
pub fn render_pdf(
    project: &Project,
    config: &PdfConfig,
    date_format: &str,
) -> std::io::Result<Vec<u8>> {
    let pages = layout_project(project, config, date_format);
    tracing::debug!(pages = pages.len(), "laid out page stream");

    let (width, height) = config.page_size.dimensions();
    let info = DocumentInfo {
        title: project.title.clone(),
        creator: CREATOR.to_string(),
        created_at: project.created_at,
    };
    PdfWriter::new(width, height, config.compress).write(&pages, &info)
}

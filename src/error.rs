//! Error types for folio export operations.

use thiserror::Error;

/// Errors that can occur while loading or exporting a project.
///
/// Every renderer failure is collapsed into exactly one variant per output
/// format, so a caller never receives a partial artifact alongside an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    /// Page-stream rendering failed. The lower-level cause is kept for
    /// diagnostics but not shown in the message.
    #[error("PDF export failed")]
    Pdf(String),

    #[error("Failed to export DOCX: {0}")]
    Docx(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Lower-level failure message carried by a render error, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Pdf(detail) | Error::Docx(detail) | Error::InvalidProject(detail) => {
                Some(detail)
            }
            Error::UnsupportedFormat(_) | Error::Io(_) | Error::Json(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

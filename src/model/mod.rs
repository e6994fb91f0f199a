//! Document model shared by all exporters.
//!
//! A [`Project`] is built entirely outside the engine and handed in whole.
//! Exporters borrow it immutably; nothing here is persisted.

mod project;

pub use project::{ExportSettings, Project, Section, WORDS_PER_PAGE, format_count};

//! Report formatting module

use anyhow::Result;
use ppa_splitter_core::{Error, FileReport};
use std::path::Path;

/// Trait for per-file report formatters
pub trait ReportFormatter: Send + Sync {
    /// Called once before the first file
    fn begin(&mut self) -> Result<()>;

    /// Report a file that was dispatched
    fn file_done(&mut self, report: &FileReport) -> Result<()>;

    /// Report a file that could not be dispatched
    fn file_failed(&mut self, path: &Path, error: &Error) -> Result<()>;

    /// Finalize output (e.g., close JSON document)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

//! JSON report formatter

use super::ReportFormatter;
use anyhow::Result;
use ppa_splitter_core::{Error, FileReport};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// JSON formatter - outputs one document once every file is done
pub struct JsonFormatter<W: Write> {
    writer: W,
    summary: RunSummary,
}

/// Data structure for JSON output
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    /// Files that were dispatched
    pub files: Vec<FileReport>,
    /// Files that failed
    pub failures: Vec<FailureData>,
}

/// A file that could not be dispatched
#[derive(Debug, Serialize)]
pub struct FailureData {
    /// Source file
    pub path: PathBuf,
    /// Error message
    pub error: String,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            summary: RunSummary::default(),
        }
    }
}

impl<W: Write + Send + Sync> ReportFormatter for JsonFormatter<W> {
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn file_done(&mut self, report: &FileReport) -> Result<()> {
        self.summary.files.push(report.clone());
        Ok(())
    }

    fn file_failed(&mut self, path: &Path, error: &Error) -> Result<()> {
        self.summary.failures.push(FailureData {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.summary)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

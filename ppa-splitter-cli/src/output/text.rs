//! Plain text report formatter

use super::ReportFormatter;
use anyhow::Result;
use ppa_splitter_core::{Error, FileReport};
use std::io::{self, Write};
use std::path::Path;

/// Plain text formatter - one block per file, failures on stderr
pub struct TextFormatter<W: Write, E: Write> {
    writer: W,
    errors: E,
}

impl<W: Write, E: Write> TextFormatter<W, E> {
    /// Create a new text formatter
    pub fn new(writer: W, errors: E) -> Self {
        Self { writer, errors }
    }
}

impl TextFormatter<io::Stdout, io::Stderr> {
    /// Create a formatter that writes to stdout and stderr
    pub fn stdout() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<W: Write + Send + Sync, E: Write + Send + Sync> ReportFormatter for TextFormatter<W, E> {
    fn begin(&mut self) -> Result<()> {
        writeln!(self.writer, "=============")?;
        writeln!(self.writer, "Processing...")?;
        Ok(())
    }

    fn file_done(&mut self, report: &FileReport) -> Result<()> {
        writeln!(self.writer, "{} has been transformed", report.path.display())?;
        writeln!(self.writer, "\t{} {} dispatched", report.units, report.unit_name)?;
        for (dataset, lines) in report.stats.non_empty() {
            writeln!(self.writer, "\t{lines} tokens in {dataset} dataset")?;
        }
        Ok(())
    }

    fn file_failed(&mut self, path: &Path, error: &Error) -> Result<()> {
        writeln!(self.errors, "{} could not be transformed: {error}", path.display())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.errors.flush()?;
        Ok(())
    }
}

//! Two-pass dispatch of corpus files into datasets
//!
//! Each file is streamed twice, one line in memory at a time:
//!
//! 1. **Count**: every line goes through the unit splitter and the number of
//!    boundaries is the number of units in the file.
//! 2. **Dispatch**: the file is read again and lines accumulate into the
//!    pending unit. When the splitter fires on the line just appended, the
//!    unit takes the next label of the precomputed [`LabelSequence`] and is
//!    handed to the [`Sink`].
//!
//! Lines left after the last boundary form a trailing unit. It goes to the
//! dataset of the unit right before it; no new label is consumed. A file with
//! a trailing unit but no completed unit has nothing to inherit from and is
//! reported as [`Error::UnlabeledTrailingUnit`].

use crate::allocator::{Dataset, DatasetCounts, LabelSequence, Ratios};
use crate::config::{ConfigSource, OverrideConfig, UnitConfig, UnitDefaults};
use crate::error::{Error, Result};
use crate::sink::Sink;
use crate::splitter::UnitSplitter;
use log::{debug, info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Run-wide dispatch settings
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Requested dataset ratios
    pub ratios: Ratios,
    /// Settings for files without an override entry
    pub defaults: UnitDefaults,
    /// Optional per-file override document
    pub overrides: Option<OverrideConfig>,
}

impl DispatchOptions {
    /// Check the defaults and every override entry without touching any file
    pub fn validate(&self) -> Result<()> {
        self.defaults.build()?;
        if let Some(overrides) = &self.overrides {
            overrides.validate(&self.defaults)?;
        }
        Ok(())
    }
}

/// Outcome of dispatching one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Source file
    pub path: PathBuf,
    /// Units found by the counting pass
    pub units: usize,
    /// Plural name of the units, e.g. `sentences`
    pub unit_name: String,
    /// Blank lines seen by the counting pass
    pub empty_lines: usize,
    /// Lines written per dataset, headers excluded
    pub stats: DatasetCounts,
    /// Lines after the last boundary that inherited the previous dataset
    pub trailing_lines: usize,
    /// Where the file's configuration came from
    pub config_source: ConfigSource,
}

/// Result of the counting pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitTally {
    /// Number of boundary lines
    pub units: usize,
    /// Number of blank lines
    pub empty_lines: usize,
}

/// Line-by-line reader that keeps terminators
struct LineReader {
    path: PathBuf,
    reader: BufReader<File>,
}

impl LineReader {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
        })
    }

    /// Replace `buf` with the next line; `false` at end of file
    fn next_line(&mut self, buf: &mut String) -> Result<bool> {
        buf.clear();
        let read = self
            .reader
            .read_line(buf)
            .map_err(|e| Error::io(&self.path, e))?;
        Ok(read > 0)
    }
}

/// Pass 1: count units and blank lines of `path`
pub fn count_units(path: &Path, config: &UnitConfig) -> Result<UnitTally> {
    let splitter = config.splitter();
    let mut reader = LineReader::open(path)?;
    let mut line = String::new();
    let mut tally = UnitTally::default();

    while reader.next_line(&mut line)? {
        if line.trim_end_matches(['\r', '\n']).is_empty() {
            tally.empty_lines += 1;
        }
        // Headers never enter a unit in pass 2, so they cannot close one here
        if splitter.is_header(&line) {
            continue;
        }
        if splitter.is_boundary(&line) {
            tally.units += 1;
        }
    }

    Ok(tally)
}

/// Process one file: count, allocate, then dispatch every unit to `sink`
pub fn process_file<S: Sink + ?Sized>(
    path: &Path,
    config: &UnitConfig,
    ratios: &Ratios,
    sink: &mut S,
) -> Result<FileReport> {
    let tally = count_units(path, config)?;
    info!(
        "{} {} to dispatch in {}",
        tally.units,
        config.unit_name(),
        path.display()
    );

    let labels = LabelSequence::allocate(tally.units, ratios);
    let (stats, trailing_lines) = dispatch_units(path, config, labels, sink)?;

    Ok(FileReport {
        path: path.to_path_buf(),
        units: tally.units,
        unit_name: config.unit_name().to_string(),
        empty_lines: tally.empty_lines,
        stats,
        trailing_lines,
        config_source: config.source(),
    })
}

/// Pass 2: stream `path` again and hand every unit to `sink`
fn dispatch_units<S: Sink + ?Sized>(
    path: &Path,
    config: &UnitConfig,
    mut labels: LabelSequence,
    sink: &mut S,
) -> Result<(DatasetCounts, usize)> {
    let splitter = config.splitter();
    let mut reader = LineReader::open(path)?;
    let mut line = String::new();
    let mut pending: Vec<String> = Vec::new();
    let mut last_label: Option<Dataset> = None;
    let mut stats = DatasetCounts::default();

    while reader.next_line(&mut line)? {
        if splitter.is_header(&line) {
            continue;
        }

        let boundary = splitter.is_boundary(&line);
        pending.push(std::mem::take(&mut line));

        if boundary {
            let label = labels
                .next()
                .ok_or_else(|| Error::LabelSequenceExhausted {
                    path: path.to_path_buf(),
                })?;
            debug!("{} line(s) to {} from {}", pending.len(), label, path.display());
            sink.write(label, path, &pending)?;
            stats.add(label, pending.len());
            pending.clear();
            last_label = Some(label);
        }
    }

    let trailing_lines = pending.len();
    if !pending.is_empty() {
        let label = last_label.ok_or_else(|| Error::UnlabeledTrailingUnit {
            path: path.to_path_buf(),
            lines: pending.len(),
        })?;
        debug!(
            "{} trailing line(s) inherit {} in {}",
            pending.len(),
            label,
            path.display()
        );
        sink.write(label, path, &pending)?;
        stats.add(label, pending.len());
    }

    Ok((stats, trailing_lines))
}

/// Dispatches files one after the other into a sink
pub struct DispatchEngine<S: Sink> {
    options: DispatchOptions,
    sink: S,
}

impl<S: Sink> DispatchEngine<S> {
    /// Create an engine, rejecting invalid defaults or override entries
    /// before any input file is opened
    pub fn new(options: DispatchOptions, sink: S) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, sink })
    }

    /// Run-wide settings
    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// The sink units are written to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the engine and return its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Configuration used for `path`
    pub fn config_for(&self, path: &Path) -> Result<UnitConfig> {
        match &self.options.overrides {
            Some(overrides) => {
                if !overrides.is_empty() && overrides.lookup(path).is_none() {
                    warn!("{} not found in configuration file", path.display());
                }
                overrides.resolve(path, &self.options.defaults)
            }
            None => self.options.defaults.build(),
        }
    }

    /// Dispatch a single file
    pub fn process(&mut self, path: &Path) -> Result<FileReport> {
        let config = self.config_for(path)?;
        process_file(path, &config, &self.options.ratios, &mut self.sink)
    }

    /// Lazily dispatch `files` in order
    ///
    /// Each item is yielded once both passes over that file are done. A
    /// failing file yields its error and the next file is still processed;
    /// dropping the iterator stops before the next file.
    pub fn run<'a, I, P>(
        &'a mut self,
        files: I,
    ) -> impl Iterator<Item = (PathBuf, Result<FileReport>)> + 'a
    where
        I: IntoIterator<Item = P>,
        I::IntoIter: 'a,
        P: AsRef<Path> + 'a,
    {
        files.into_iter().map(move |file| {
            let path = file.as_ref().to_path_buf();
            let report = self.process(&path);
            (path, report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn sentences(count: usize) -> String {
        (0..count)
            .map(|i| format!("w{i}\tw{i}\tNOM\n.\t.\tPON\n"))
            .collect()
    }

    #[test]
    fn test_count_units() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "a.tsv", "a\ta\n.\t.\n\nb\tb\n!\t!\n\n");
        let config = UnitDefaults::default().build().unwrap();

        let tally = count_units(&path, &config).unwrap();
        assert_eq!(tally.units, 2);
        assert_eq!(tally.empty_lines, 2);
    }

    #[test]
    fn test_count_skips_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "h.tsv", "form\tlemma\tPOS\tmorph\n.\t.\tPON\tx\n");
        let config = UnitConfig::new(
            crate::SplitterKind::Punctuation,
            vec![".".to_string(), "form".to_string()],
            "\t",
            ConfigSource::Default,
        )
        .unwrap();

        assert_eq!(count_units(&path, &config).unwrap().units, 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let config = UnitDefaults::default().build().unwrap();
        let err = count_units(Path::new("/nonexistent/corpus.tsv"), &config).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_process_file_counts_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ten.tsv", &sentences(10));
        let config = UnitDefaults::default().build().unwrap();
        let mut sink = MemorySink::new();

        let report = process_file(&path, &config, &Ratios::default(), &mut sink).unwrap();
        assert_eq!(report.units, 10);
        assert_eq!(report.unit_name, "sentences");
        assert_eq!(report.stats.get(Dataset::Train), 16);
        assert_eq!(report.stats.get(Dataset::Test), 4);
        assert_eq!(report.stats.get(Dataset::Dev), 0);
        assert_eq!(report.trailing_lines, 0);
        assert_eq!(sink.units().len(), 10);
    }

    #[test]
    fn test_trailing_unit_inherits_last_label() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "t.tsv", &format!("{}x\tx\ny\ty\n", sentences(3)));
        let config = UnitDefaults::default().build().unwrap();
        let mut sink = MemorySink::new();

        let report = process_file(&path, &config, &Ratios::default(), &mut sink).unwrap();
        assert_eq!(report.units, 3);
        assert_eq!(report.trailing_lines, 2);

        let units = sink.units();
        assert_eq!(units.len(), 4);
        assert_eq!(units[3].dataset, units[2].dataset);
        assert_eq!(units[3].lines, vec!["x\tx\n".to_string(), "y\ty\n".to_string()]);
        assert_eq!(report.stats.total(), 8);
    }

    #[test]
    fn test_trailing_unit_without_completed_unit() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "u.tsv", "x\tx\ny\ty\n");
        let config = UnitDefaults::default().build().unwrap();
        let mut sink = MemorySink::new();

        let err = process_file(&path, &config, &Ratios::default(), &mut sink).unwrap_err();
        match err {
            Error::UnlabeledTrailingUnit { path: p, lines } => {
                assert_eq!(p, path);
                assert_eq!(lines, 2);
            }
            other => panic!("expected UnlabeledTrailingUnit, got {other:?}"),
        }
        assert!(sink.units().is_empty());
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.tsv", "");
        let config = UnitDefaults::default().build().unwrap();
        let mut sink = MemorySink::new();

        let report = process_file(&path, &config, &Ratios::default(), &mut sink).unwrap();
        assert_eq!(report.units, 0);
        assert_eq!(report.stats.total(), 0);
    }

    #[test]
    fn test_engine_rejects_invalid_override_before_io() {
        let mut overrides = OverrideConfig::default();
        overrides.files.insert(
            "a.tsv".to_string(),
            crate::FileOverride {
                splitter: crate::SplitterKind::Regex,
                sentence_markers: Some(vec!["(".to_string()]),
                column_marker: None,
            },
        );
        let options = DispatchOptions {
            overrides: Some(overrides),
            ..DispatchOptions::default()
        };

        let err = DispatchEngine::new(options, MemorySink::new())
            .err()
            .expect("invalid override must be rejected");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_engine_run_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.tsv", &sentences(5));
        let missing = dir.path().join("missing.tsv");

        let mut engine = DispatchEngine::new(DispatchOptions::default(), MemorySink::new()).unwrap();
        let results: Vec<_> = engine.run([&missing, &good]).collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_err());
        assert_eq!(results[1].1.as_ref().unwrap().units, 5);
        assert_eq!(engine.sink().units().len(), 5);
    }

    #[test]
    fn test_engine_uses_override_entry() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "blocks.tsv", "a\n.\n\nb\nc\n\n");

        let mut overrides = OverrideConfig::default();
        overrides.files.insert(
            path.to_string_lossy().into_owned(),
            crate::FileOverride {
                splitter: crate::SplitterKind::EmptyLine,
                ..Default::default()
            },
        );
        let options = DispatchOptions {
            overrides: Some(overrides),
            ..DispatchOptions::default()
        };

        let mut engine = DispatchEngine::new(options, MemorySink::new()).unwrap();
        let report = engine.process(&path).unwrap();
        assert_eq!(report.units, 2);
        assert_eq!(report.config_source, ConfigSource::Override);
        assert_eq!(engine.sink().units()[0].lines.len(), 3);
    }
}

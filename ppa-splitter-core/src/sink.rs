//! Unit persistence
//!
//! A sink receives every completed unit with its dataset and source file.
//! [`DirectorySink`] appends units to `root/<dataset>/<source basename>`;
//! [`MemorySink`] keeps them in memory.

use crate::allocator::Dataset;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination of completed units
pub trait Sink {
    /// Persist `lines` (one unit, terminators included) for `dataset`
    fn write(&mut self, dataset: Dataset, source: &Path, lines: &[String]) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, dataset: Dataset, source: &Path, lines: &[String]) -> Result<()> {
        (**self).write(dataset, source, lines)
    }
}

/// Appends units under `root/<dataset>/<source basename>`
///
/// Files are opened in append mode for each unit, so repeated runs and
/// sources sharing a basename accumulate into the same destination.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    created_dirs: HashSet<PathBuf>,
}

impl DirectorySink {
    /// Create a sink rooted at `root`; directories are created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            created_dirs: HashSet::new(),
        }
    }

    /// Create `root` and one directory per dataset up front
    pub fn prepare(root: impl Into<PathBuf>) -> Result<Self> {
        let mut sink = Self::new(root);
        for dataset in Dataset::ALL {
            sink.ensure_dir(dataset)?;
        }
        Ok(sink)
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that units of `source` in `dataset` are appended to
    pub fn destination(&self, dataset: Dataset, source: &Path) -> PathBuf {
        let name = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| source.as_os_str().to_os_string());
        self.root.join(dataset.as_str()).join(name)
    }

    fn ensure_dir(&mut self, dataset: Dataset) -> Result<()> {
        let dir = self.root.join(dataset.as_str());
        if !self.created_dirs.contains(&dir) {
            fs::create_dir_all(&dir).map_err(|e| Error::sink(&dir, e))?;
            self.created_dirs.insert(dir);
        }
        Ok(())
    }
}

impl Sink for DirectorySink {
    fn write(&mut self, dataset: Dataset, source: &Path, lines: &[String]) -> Result<()> {
        self.ensure_dir(dataset)?;
        let path = self.destination(dataset, source);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::sink(&path, e))?;

        let mut writer = BufWriter::new(file);
        for line in lines {
            writer
                .write_all(line.as_bytes())
                .map_err(|e| Error::sink(&path, e))?;
        }
        writer.flush().map_err(|e| Error::sink(&path, e))?;

        Ok(())
    }
}

/// A unit captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUnit {
    /// Dataset the unit was assigned to
    pub dataset: Dataset,
    /// Source file
    pub source: PathBuf,
    /// Raw lines of the unit
    pub lines: Vec<String>,
}

/// Keeps every unit in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    units: Vec<RecordedUnit>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Units in dispatch order
    pub fn units(&self) -> &[RecordedUnit] {
        &self.units
    }

    /// Units assigned to `dataset`, in dispatch order
    pub fn units_in(&self, dataset: Dataset) -> impl Iterator<Item = &RecordedUnit> {
        self.units.iter().filter(move |u| u.dataset == dataset)
    }

    /// Datasets in dispatch order
    pub fn labels(&self) -> Vec<Dataset> {
        self.units.iter().map(|u| u.dataset).collect()
    }
}

impl Sink for MemorySink {
    fn write(&mut self, dataset: Dataset, source: &Path, lines: &[String]) -> Result<()> {
        self.units.push(RecordedUnit {
            dataset,
            source: source.to_path_buf(),
            lines: lines.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn unit(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_directory_sink_creates_dataset_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path().join("out"));

        sink.write(
            Dataset::Test,
            Path::new("corpus/lucan.tsv"),
            &unit(&["a\ta\n", ".\t.\n"]),
        )
        .unwrap();

        let written = fs::read_to_string(temp_dir.path().join("out/test/lucan.tsv")).unwrap();
        assert_eq!(written, "a\ta\n.\t.\n");
        assert!(!temp_dir.path().join("out/train").exists());
    }

    #[test]
    fn test_directory_sink_appends() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path());
        let source = Path::new("a.tsv");

        sink.write(Dataset::Train, source, &unit(&["1\n"])).unwrap();
        sink.write(Dataset::Train, source, &unit(&["2\n"])).unwrap();

        // A second sink over the same root keeps appending
        let mut again = DirectorySink::new(temp_dir.path());
        again.write(Dataset::Train, source, &unit(&["3\n"])).unwrap();

        let written = fs::read_to_string(temp_dir.path().join("train/a.tsv")).unwrap();
        assert_eq!(written, "1\n2\n3\n");
    }

    #[test]
    fn test_colliding_basenames_share_destination() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path());

        sink.write(Dataset::Dev, Path::new("x/data.tsv"), &unit(&["x\n"]))
            .unwrap();
        sink.write(Dataset::Dev, Path::new("y/data.tsv"), &unit(&["y\n"]))
            .unwrap();

        let written = fs::read_to_string(temp_dir.path().join("dev/data.tsv")).unwrap();
        assert_eq!(written, "x\ny\n");
    }

    #[test]
    fn test_lines_written_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path());

        sink.write(
            Dataset::Train,
            Path::new("crlf.tsv"),
            &unit(&["a\tb\r\n", "no newline"]),
        )
        .unwrap();

        let written = fs::read(temp_dir.path().join("train/crlf.tsv")).unwrap();
        assert_eq!(written, b"a\tb\r\nno newline");
    }

    #[test]
    fn test_prepare_creates_all_datasets() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("output");
        let sink = DirectorySink::prepare(&root).unwrap();

        assert_eq!(sink.root(), root.as_path());
        for dataset in Dataset::ALL {
            assert!(root.join(dataset.as_str()).is_dir());
        }
    }

    #[test]
    fn test_memory_sink_records_order() {
        let mut sink = MemorySink::new();
        sink.write(Dataset::Train, Path::new("a"), &unit(&["1\n"]))
            .unwrap();
        sink.write(Dataset::Test, Path::new("a"), &unit(&["2\n"]))
            .unwrap();

        assert_eq!(sink.labels(), vec![Dataset::Train, Dataset::Test]);
        assert_eq!(sink.units_in(Dataset::Test).count(), 1);
        assert_eq!(sink.units()[0].lines, unit(&["1\n"]));
    }
}

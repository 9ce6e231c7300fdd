//! Train/test/dev splitting of tabular linguistic corpora
//!
//! Corpus files hold one token per line with column-separated annotations,
//! and sentences (units) are closed by a marker line. This crate splits such
//! files into training, test and development sets while keeping memory bounded:
//! every file is streamed twice, once to count its units and once to dispatch
//! them according to a precomputed, evenly interleaved label sequence.
//!
//! # Architecture
//!
//! - [`splitter`]: the per-line boundary predicate
//! - [`allocator`]: ratios and the label sequence
//! - [`config`]: per-file configuration and the override document
//! - [`dispatch`]: the two-pass engine
//! - [`sink`]: persistence of completed units
//!
//! # Example
//!
//! ```rust
//! use ppa_splitter_core::{DispatchEngine, DispatchOptions, MemorySink, Ratios};
//! # use std::io::Write;
//! # let mut file = tempfile::NamedTempFile::new().unwrap();
//! # for i in 0..10 {
//! #     write!(file, "w{i}\tw{i}\tNOM\n.\t.\tPON\n").unwrap();
//! # }
//!
//! let options = DispatchOptions {
//!     ratios: Ratios::new(0.8, 0.2, 0.0).unwrap(),
//!     ..DispatchOptions::default()
//! };
//! let mut engine = DispatchEngine::new(options, MemorySink::new()).unwrap();
//!
//! let report = engine.process(file.path()).unwrap();
//! assert_eq!(report.units, 10);
//! assert_eq!(report.stats.total(), 20);
//! ```

pub mod allocator;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod sink;
pub mod splitter;

pub use allocator::{
    build_label_sequence, target_counts, Dataset, DatasetCounts, LabelSequence, Ratios,
};
pub use config::{ConfigSource, FileOverride, OverrideConfig, UnitConfig, UnitDefaults};
pub use dispatch::{
    count_units, process_file, DispatchEngine, DispatchOptions, FileReport, UnitTally,
};
pub use error::{Error, Result};
pub use sink::{DirectorySink, MemorySink, RecordedUnit, Sink};
pub use splitter::{
    is_header, markers_from_chars, Splitter, SplitterKind, UnitSplitter, DEFAULT_COLUMN_MARKER,
    DEFAULT_SENTENCE_MARKERS,
};

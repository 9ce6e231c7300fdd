//! Error types for the splitting pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for splitting operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid ratios, markers or override document
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An input file could not be opened or read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The sink could not persist a unit
    #[error("Failed to write {}: {source}", .path.display())]
    Sink {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Lines remain after the last boundary but no unit was ever completed,
    /// so there is no dataset for them to inherit
    #[error(
        "{}: {lines} trailing line(s) follow no completed unit, no dataset to assign them to",
        .path.display()
    )]
    UnlabeledTrailingUnit {
        /// Offending input file
        path: PathBuf,
        /// Number of lines left in the pending unit
        lines: usize,
    },

    /// Pass 2 completed more units than pass 1 counted
    #[error("{}: more units found than were counted, label sequence exhausted", .path.display())]
    LabelSequenceExhausted {
        /// Offending input file
        path: PathBuf,
    },
}

impl Error {
    /// Shorthand for an input read failure
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for an output write failure
    pub(crate) fn sink(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Sink {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a configuration problem rather than a per-file one
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Result type for splitting operations
pub type Result<T> = std::result::Result<T, Error>;

//! Per-file splitting configuration
//!
//! Every input file is processed with a [`UnitConfig`]. It comes either from
//! an entry of the override document ([`OverrideConfig`]) or, when the file
//! has no entry, from the run-wide [`UnitDefaults`].

mod loader;
mod types;

pub use types::{FileOverride, OverrideConfig};

use crate::error::Result;
use crate::splitter::{
    Splitter, SplitterKind, UnitSplitter, DEFAULT_COLUMN_MARKER, DEFAULT_SENTENCE_MARKERS,
};
use serde::Serialize;

/// Run-wide settings applied to files without an override entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDefaults {
    /// Boundary rule
    pub splitter: SplitterKind,
    /// Markers for the boundary rule
    pub sentence_markers: Vec<String>,
    /// Column separator
    pub column_marker: String,
}

impl Default for UnitDefaults {
    fn default() -> Self {
        Self {
            splitter: SplitterKind::default(),
            sentence_markers: DEFAULT_SENTENCE_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            column_marker: DEFAULT_COLUMN_MARKER.to_string(),
        }
    }
}

impl UnitDefaults {
    /// The override entry equivalent to these defaults, written out in full
    pub fn to_override(&self) -> FileOverride {
        FileOverride {
            splitter: self.splitter,
            sentence_markers: Some(self.sentence_markers.clone()),
            column_marker: Some(self.column_marker.clone()),
        }
    }

    /// Build the configuration used for files without an override
    pub fn build(&self) -> Result<UnitConfig> {
        UnitConfig::new(
            self.splitter,
            self.sentence_markers.clone(),
            &self.column_marker,
            ConfigSource::Default,
        )
    }
}

/// Where a file's configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Run-wide defaults
    Default,
    /// An entry of the override document
    Override,
}

/// Configuration for one file, fixed for the duration of its processing
#[derive(Debug, Clone)]
pub struct UnitConfig {
    splitter: Splitter,
    sentence_markers: Vec<String>,
    source: ConfigSource,
}

impl UnitConfig {
    /// Build and validate a configuration
    pub fn new(
        kind: SplitterKind,
        sentence_markers: Vec<String>,
        column_marker: &str,
        source: ConfigSource,
    ) -> Result<Self> {
        let splitter = Splitter::new(kind, &sentence_markers, column_marker)?;
        Ok(Self {
            splitter,
            sentence_markers,
            source,
        })
    }

    /// Boundary predicate
    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }

    /// Boundary rule
    pub fn kind(&self) -> SplitterKind {
        self.splitter.kind()
    }

    /// Markers the boundary rule was built from
    pub fn sentence_markers(&self) -> &[String] {
        &self.sentence_markers
    }

    /// Column separator
    pub fn column_marker(&self) -> &str {
        self.splitter.column_marker()
    }

    /// Plural unit name for log messages
    pub fn unit_name(&self) -> &str {
        self.splitter.unit_name()
    }

    /// Where this configuration came from
    pub fn source(&self) -> ConfigSource {
        self.source
    }
}

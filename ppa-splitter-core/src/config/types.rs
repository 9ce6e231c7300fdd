use super::{ConfigSource, UnitConfig, UnitDefaults};
use crate::error::Result;
use crate::splitter::SplitterKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Settings for one file; absent fields fall back to the run-wide defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileOverride {
    /// Boundary rule, `punctuation` when omitted
    #[serde(default)]
    pub splitter: SplitterKind,
    /// Markers or patterns for the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_markers: Option<Vec<String>>,
    /// Column separator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_marker: Option<String>,
}

impl FileOverride {
    /// Fill the gaps from `defaults` and build the configuration
    pub fn resolve(&self, defaults: &UnitDefaults) -> Result<UnitConfig> {
        let markers = self
            .sentence_markers
            .clone()
            .unwrap_or_else(|| defaults.sentence_markers.clone());
        let column_marker = self
            .column_marker
            .as_deref()
            .unwrap_or(&defaults.column_marker);

        UnitConfig::new(self.splitter, markers, column_marker, ConfigSource::Override)
    }
}

/// Per-file override document, keyed by file path
///
/// ```toml
/// [files."corpus/lucan.tsv"]
/// splitter = "punctuation"
/// sentence_markers = [".", ";"]
/// column_marker = "\t"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideConfig {
    /// Entries keyed by the path as given on the command line
    #[serde(default)]
    pub files: BTreeMap<String, FileOverride>,
}

impl OverrideConfig {
    /// Number of file entries
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the document has no entries
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Entry for `path`, if any
    pub fn lookup(&self, path: &Path) -> Option<&FileOverride> {
        let key = path.to_string_lossy();
        self.files.get(&*key).or_else(|| {
            key.strip_prefix("./")
                .and_then(|stripped| self.files.get(stripped))
        })
    }

    /// Configuration for `path`: its entry if present, `defaults` otherwise
    pub fn resolve(&self, path: &Path, defaults: &UnitDefaults) -> Result<UnitConfig> {
        match self.lookup(path) {
            Some(entry) => entry.resolve(defaults),
            None => defaults.build(),
        }
    }

    /// Check that every entry builds a valid configuration
    pub fn validate(&self, defaults: &UnitDefaults) -> Result<()> {
        for (path, entry) in &self.files {
            entry.resolve(defaults).map_err(|e| match e {
                crate::Error::Configuration(msg) => {
                    crate::Error::Configuration(format!("entry '{path}': {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Blank document listing every target with the default settings
    ///
    /// Entries already present in `existing` are kept as they are.
    pub fn generate_blank<P: AsRef<Path>>(
        targets: &[P],
        defaults: &UnitDefaults,
        existing: Option<OverrideConfig>,
    ) -> Self {
        let mut config = existing.unwrap_or_default();
        for target in targets {
            let key = target.as_ref().to_string_lossy().into_owned();
            config
                .files
                .entry(key)
                .or_insert_with(|| defaults.to_override());
        }
        config
    }
}

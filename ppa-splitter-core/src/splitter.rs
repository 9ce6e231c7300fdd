//! Unit boundary detection over single corpus lines
//!
//! A corpus file holds one token per line with tab (or otherwise) separated
//! columns. A *unit* is a run of consecutive lines closed by a boundary line.
//! The splitter decides, for one line at a time, whether that line closes
//! the current unit. The answer depends only on the line, so the counting
//! pass and the dispatching pass always agree.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Sentence-ending tokens used when neither the CLI nor an override names any
pub const DEFAULT_SENTENCE_MARKERS: &[&str] = &[".", "!", "?", ";", ":"];

/// Column separator used when none is configured
pub const DEFAULT_COLUMN_MARKER: &str = "\t";

/// Leading fields of a header row
pub const HEADER_FIELDS: [&str; 4] = ["form", "lemma", "POS", "morph"];

/// Decides whether a line terminates the unit it belongs to
pub trait UnitSplitter {
    /// Returns `true` if `line` closes the current unit
    fn is_boundary(&self, line: &str) -> bool;

    /// Plural name of the unit, used in log messages
    fn unit_name(&self) -> &str;
}

/// Available boundary rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitterKind {
    /// First column equals one of the markers
    #[default]
    Punctuation,
    /// Line is blank
    EmptyLine,
    /// First column fully matches one of the marker regexes
    Regex,
}

impl SplitterKind {
    /// Name used in configuration files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitterKind::Punctuation => "punctuation",
            SplitterKind::EmptyLine => "empty_line",
            SplitterKind::Regex => "regex",
        }
    }

    /// Whether this rule reads the marker list
    pub fn uses_markers(&self) -> bool {
        !matches!(self, SplitterKind::EmptyLine)
    }
}

impl fmt::Display for SplitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
enum Rule {
    Markers(HashSet<String>),
    Blank,
    Patterns(Vec<Regex>),
}

/// A configured boundary predicate
#[derive(Debug, Clone)]
pub struct Splitter {
    kind: SplitterKind,
    column_marker: String,
    rule: Rule,
}

impl Splitter {
    /// Build a splitter of the given kind
    ///
    /// `markers` is ignored for [`SplitterKind::EmptyLine`]. For the other kinds
    /// it must not be empty, and for [`SplitterKind::Regex`] every marker must
    /// compile.
    pub fn new(kind: SplitterKind, markers: &[String], column_marker: &str) -> Result<Self> {
        if column_marker.is_empty() {
            return Err(Error::Configuration(
                "column marker must not be empty".into(),
            ));
        }

        if kind.uses_markers() && markers.is_empty() {
            return Err(Error::Configuration(format!(
                "the {kind} splitter needs at least one sentence marker"
            )));
        }

        let rule = match kind {
            SplitterKind::Punctuation => Rule::Markers(markers.iter().cloned().collect()),
            SplitterKind::EmptyLine => Rule::Blank,
            SplitterKind::Regex => {
                let patterns = markers
                    .iter()
                    .map(|pattern| {
                        Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
                            Error::Configuration(format!(
                                "invalid sentence marker pattern '{pattern}': {e}"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Rule::Patterns(patterns)
            }
        };

        Ok(Self {
            kind,
            column_marker: column_marker.to_string(),
            rule,
        })
    }

    /// Punctuation splitter over [`DEFAULT_SENTENCE_MARKERS`] and tab columns
    pub fn with_defaults() -> Self {
        Self {
            kind: SplitterKind::Punctuation,
            column_marker: DEFAULT_COLUMN_MARKER.to_string(),
            rule: Rule::Markers(
                DEFAULT_SENTENCE_MARKERS
                    .iter()
                    .map(|m| m.to_string())
                    .collect(),
            ),
        }
    }

    /// The rule this splitter applies
    pub fn kind(&self) -> SplitterKind {
        self.kind
    }

    /// Column separator
    pub fn column_marker(&self) -> &str {
        &self.column_marker
    }

    /// Whether `line` is a `form lemma POS morph` header row
    pub fn is_header(&self, line: &str) -> bool {
        is_header(line, &self.column_marker)
    }

    fn first_field<'a>(&self, line: &'a str) -> &'a str {
        line.trim_end_matches(['\r', '\n'])
            .split(self.column_marker.as_str())
            .next()
            .unwrap_or_default()
            .trim()
    }
}

impl UnitSplitter for Splitter {
    fn is_boundary(&self, line: &str) -> bool {
        match &self.rule {
            Rule::Markers(markers) => markers.contains(self.first_field(line)),
            Rule::Blank => line.trim().is_empty(),
            Rule::Patterns(patterns) => {
                let token = self.first_field(line);
                patterns.iter().any(|p| p.is_match(token))
            }
        }
    }

    fn unit_name(&self) -> &str {
        match self.kind {
            SplitterKind::EmptyLine => "blocks",
            SplitterKind::Punctuation | SplitterKind::Regex => "sentences",
        }
    }
}

/// Whether the first four fields of `line` are exactly [`HEADER_FIELDS`]
pub fn is_header(line: &str, column_marker: &str) -> bool {
    let mut fields = line.trim().split(column_marker);
    HEADER_FIELDS
        .iter()
        .all(|expected| fields.next() == Some(*expected))
}

/// Turn a marker string such as `".!?"` into one marker per character
pub fn markers_from_chars(chars: &str) -> Vec<String> {
    chars
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(String::from)
        .collect()
}

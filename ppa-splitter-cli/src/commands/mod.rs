//! CLI command implementations

use anyhow::Result;
use clap::{Args, Subcommand};
use ppa_splitter_core::{markers_from_chars, SplitterKind, UnitDefaults};

pub mod dispatch;
pub mod generate_config;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split corpus files into train, test and dev datasets
    Dispatch(dispatch::DispatchArgs),

    /// Write a blank per-file configuration for the given files
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Check a per-file configuration file
    Validate(validate::ValidateArgs),
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Dispatch(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
        }
    }
}

/// Supported boundary rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SplitterArg {
    /// First column is one of the sentence markers
    Punctuation,
    /// Blank lines separate units
    #[value(name = "empty_line", alias = "empty-line")]
    EmptyLine,
    /// First column fully matches one of the marker patterns
    Regex,
}

impl From<SplitterArg> for SplitterKind {
    fn from(arg: SplitterArg) -> Self {
        match arg {
            SplitterArg::Punctuation => SplitterKind::Punctuation,
            SplitterArg::EmptyLine => SplitterKind::EmptyLine,
            SplitterArg::Regex => SplitterKind::Regex,
        }
    }
}

/// Splitting settings applied to files without their own configuration
#[derive(Debug, Clone, Args)]
pub struct UnitArgs {
    /// Character that separates columns in your files (`\t` is TAB)
    #[arg(long = "col", value_name = "MARKER", default_value = "\\t")]
    pub col_marker: String,

    /// Tokens that end a sentence, one per character (whitespace-separated
    /// patterns with `--splitter regex`)
    #[arg(long = "sentence", value_name = "MARKERS", default_value = ".!?;:")]
    pub sentence_marker: String,

    /// How sentence boundaries are detected
    #[arg(long, value_enum, default_value = "punctuation")]
    pub splitter: SplitterArg,
}

impl Default for UnitArgs {
    fn default() -> Self {
        Self {
            col_marker: "\\t".to_string(),
            sentence_marker: ".!?;:".to_string(),
            splitter: SplitterArg::Punctuation,
        }
    }
}

impl UnitArgs {
    /// Run-wide defaults described by these arguments
    pub fn defaults(&self) -> UnitDefaults {
        let splitter = SplitterKind::from(self.splitter);
        let sentence_markers = match splitter {
            SplitterKind::Regex => self
                .sentence_marker
                .split_whitespace()
                .map(String::from)
                .collect(),
            SplitterKind::Punctuation | SplitterKind::EmptyLine => {
                markers_from_chars(&self.sentence_marker)
            }
        };

        UnitDefaults {
            splitter,
            sentence_markers,
            column_marker: unescape_marker(&self.col_marker),
        }
    }
}

/// Turn the `\t` escape into a real TAB so it can be typed on a command line
pub fn unescape_marker(raw: &str) -> String {
    raw.replace("\\t", "\t")
}

/// Initialize logging based on verbosity level
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        // A logger may already be installed when commands run in-process
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(log_level),
        )
        .try_init();
    }
}

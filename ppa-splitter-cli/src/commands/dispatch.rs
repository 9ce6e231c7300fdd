//! Dispatch command implementation

use super::{init_logging, UnitArgs};
use crate::error::{is_no_input_files, CliError};
use crate::input::resolve_patterns;
use crate::output::{JsonFormatter, ReportFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use crate::prompt::confirm_clear;
use anyhow::{Context, Result};
use clap::Args;
use ppa_splitter_core::{DirectorySink, DispatchEngine, DispatchOptions, OverrideConfig, Ratios};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

/// Arguments for the dispatch command
#[derive(Debug, Args)]
pub struct DispatchArgs {
    /// A unix wildcard or single file path, eg. 'pandora.tsv' or 'data/*.tsv'
    #[arg(value_name = "PATH/PATTERN", required = true)]
    pub paths: Vec<String>,

    /// Ratio of data to use for training
    #[arg(long, default_value_t = 0.8, allow_negative_numbers = true)]
    pub train: f64,

    /// Ratio of data to use for testing
    #[arg(long, default_value_t = 0.2, allow_negative_numbers = true)]
    pub test: f64,

    /// Ratio of data to use for dev
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub dev: f64,

    #[command(flatten)]
    pub unit: UnitArgs,

    /// Directory in which to save files
    #[arg(short, long, value_name = "DIR", default_value = "./output")]
    pub output: PathBuf,

    /// Per-file configuration file (TOML) for advanced settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Remove data in output directory (you'll need to confirm)
    #[arg(long)]
    pub clear: bool,

    /// Confirm --clear without asking
    #[arg(short, long, requires = "clear")]
    pub yes: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress progress and log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary per file
    Text,
    /// One JSON document for the whole run
    Json,
}

impl DispatchArgs {
    /// Execute the dispatch command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {:?}", self);

        // Configuration problems surface before any input or output is touched
        let ratios = Ratios::new(self.train, self.test, self.dev)?;
        let overrides = self
            .config
            .as_deref()
            .map(OverrideConfig::from_file)
            .transpose()?;
        let options = DispatchOptions {
            ratios,
            defaults: self.unit.defaults(),
            overrides,
        };
        options.validate()?;

        let files = match resolve_patterns(&self.paths) {
            Ok(files) => files,
            Err(e) if is_no_input_files(&e) => {
                println!("{e}");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        log::info!("{} file(s) to dispatch", files.len());

        if self.clear {
            self.clear_output()?;
        }

        let sink = DirectorySink::prepare(&self.output).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output.display()
            )
        })?;
        let mut engine = DispatchEngine::new(options, sink)?;

        let mut formatter: Box<dyn ReportFormatter> = match self.format {
            OutputFormat::Text => Box::new(TextFormatter::stdout()),
            OutputFormat::Json => Box::new(JsonFormatter::new(io::stdout())),
        };
        // The bar would interleave with the JSON document on stdout
        let progress = ProgressReporter::new(
            files.len() as u64,
            self.quiet || self.format == OutputFormat::Json,
        );

        formatter.begin()?;

        let mut failed = 0usize;
        for (path, result) in engine.run(&files) {
            match result {
                Ok(report) => progress.suspend(|| formatter.file_done(&report))?,
                Err(e) => {
                    failed += 1;
                    log::debug!("{} failed: {:?}", path.display(), e);
                    progress.suspend(|| formatter.file_failed(&path, &e))?;
                }
            }
            progress.file_completed(&path.display().to_string());
        }

        progress.finish();
        formatter.finish()?;

        if failed > 0 {
            return Err(CliError::ProcessingError(format!(
                "{failed} of {} file(s) could not be transformed",
                files.len()
            ))
            .into());
        }

        Ok(())
    }

    /// Remove the output directory once confirmed
    fn clear_output(&self) -> Result<()> {
        let confirmed = self.yes || {
            let stdin = io::stdin();
            confirm_clear(&mut stdin.lock(), &mut io::stdout(), &self.output)
                .context("Failed to read confirmation")?
        };

        if !confirmed {
            println!("\tData were not removed");
            return Ok(());
        }

        println!("\tRemoving data in {}", self.output.display());
        match fs::remove_dir_all(&self.output) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove {}", self.output.display())),
        }
    }
}

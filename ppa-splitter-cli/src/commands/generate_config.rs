//! Generate config command implementation

use super::UnitArgs;
use crate::error::is_no_input_files;
use crate::input::resolve_patterns;
use anyhow::{Context, Result};
use clap::Args;
use ppa_splitter_core::OverrideConfig;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// A unix wildcard or single file path, eg. 'pandora.tsv' or 'data/*.tsv'
    #[arg(value_name = "PATH/PATTERN", required = true)]
    pub paths: Vec<String>,

    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "empty.toml")]
    pub output: PathBuf,

    /// Existing configuration whose entries are kept
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub unit: UnitArgs,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        let files = match resolve_patterns(&self.paths) {
            Ok(files) => files,
            Err(e) if is_no_input_files(&e) => {
                println!("{e}");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let existing = self
            .input
            .as_deref()
            .map(OverrideConfig::from_file)
            .transpose()?;

        println!("Generating per-file configuration template...");
        println!("  Files: {}", files.len());
        println!("  Output file: {}", self.output.display());

        let config = OverrideConfig::generate_blank(&files, &self.unit.defaults(), existing);
        config
            .write_to(&self.output)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the entries of files that need their own splitter or markers");
        println!("2. Validate your configuration:");
        println!("   ppa-splitter validate --config {}", self.output.display());
        println!("3. Use it for dispatching:");
        println!(
            "   ppa-splitter dispatch <PATH/PATTERN> --config {}",
            self.output.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppa_splitter_core::SplitterKind;
    use std::fs;
    use tempfile::TempDir;

    fn args(paths: Vec<String>, output: PathBuf) -> GenerateConfigArgs {
        GenerateConfigArgs {
            paths,
            output,
            input: None,
            unit: UnitArgs::default(),
        }
    }

    #[test]
    fn test_generate_config_args_debug() {
        let args = args(vec!["*.tsv".to_string()], PathBuf::from("empty.toml"));
        let debug_str = format!("{:?}", args);
        assert!(debug_str.contains("GenerateConfigArgs"));
        assert!(debug_str.contains("empty.toml"));
    }

    #[test]
    fn test_execute_lists_every_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.tsv"), ".\n").unwrap();
        fs::write(temp_dir.path().join("b.tsv"), ".\n").unwrap();
        let output = temp_dir.path().join("empty.toml");

        let pattern = temp_dir.path().join("*.tsv").to_string_lossy().into_owned();
        args(vec![pattern], output.clone()).execute().unwrap();

        let config = OverrideConfig::from_file(&output).unwrap();
        assert_eq!(config.len(), 2);
        let key = temp_dir.path().join("a.tsv").to_string_lossy().into_owned();
        assert_eq!(config.files[&key].splitter, SplitterKind::Punctuation);
    }

    #[test]
    fn test_execute_keeps_existing_entries() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.tsv");
        fs::write(&file, ".\n").unwrap();
        let key = file.to_string_lossy().into_owned();

        let input = temp_dir.path().join("old.toml");
        fs::write(
            &input,
            format!("[files.{key:?}]\nsplitter = \"empty_line\"\n"),
        )
        .unwrap();
        let output = temp_dir.path().join("new.toml");

        let mut args = args(vec![key.clone()], output.clone());
        args.input = Some(input);
        args.execute().unwrap();

        let config = OverrideConfig::from_file(&output).unwrap();
        assert_eq!(config.files[&key].splitter, SplitterKind::EmptyLine);
    }

    #[test]
    fn test_no_files_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("empty.toml");
        let pattern = temp_dir.path().join("*.tsv").to_string_lossy().into_owned();

        assert!(args(vec![pattern], output.clone()).execute().is_ok());
        assert!(!output.exists());
    }
}

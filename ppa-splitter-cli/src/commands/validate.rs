//! Validate command implementation

use super::UnitArgs;
use anyhow::Result;
use clap::Args;
use ppa_splitter_core::OverrideConfig;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the per-file configuration to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub config: PathBuf,

    #[command(flatten)]
    pub unit: UnitArgs,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        let result = OverrideConfig::from_file(&self.config)
            .and_then(|config| config.validate(&self.unit.defaults()).map(|()| config));

        match result {
            Ok(config) => {
                println!("✓ Configuration is valid!");
                println!("  Entries: {}", config.len());
                for (path, entry) in &config.files {
                    println!("  {path}: {}", entry.splitter);
                }
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e}");
                Err(anyhow::anyhow!("Validation failed: {}", e))
            }
        }
    }
}

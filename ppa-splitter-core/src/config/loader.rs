use super::OverrideConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

impl OverrideConfig {
    /// Parse an override document from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse override document: {e}")))
    }

    /// Load an override document from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!(
                "Failed to read file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::Configuration(format!(
                "Failed to parse TOML from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Render the document as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| Error::Configuration(format!("Failed to serialize override document: {e}")))
    }

    /// Write the document to disk as TOML
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|e| Error::sink(path, e))
    }
}

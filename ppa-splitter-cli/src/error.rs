//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// No file matched the given paths or patterns
    NoInputFiles,
    /// Invalid file pattern
    InvalidPattern(String),
    /// One or more files could not be dispatched
    ProcessingError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NoInputFiles => write!(f, "There is no such files"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::ProcessingError(msg) => write!(f, "Processing error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Whether `error` is, or wraps, [`CliError::NoInputFiles`]
pub fn is_no_input_files(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<CliError>(), Some(CliError::NoInputFiles))
}

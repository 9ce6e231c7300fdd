//! ppa-splitter CLI library
//!
//! This library provides the command-line interface for dispatching
//! annotated corpus files into train, test and dev datasets.

pub mod commands;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;
pub mod prompt;

pub use error::CliError;

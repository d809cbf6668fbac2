//! Error types for the conversion pipeline.
//!
//! Malformed field values never surface here: the record transformer
//! degrades them to empty or raw values. Only failures that stop a whole
//! source (or the whole run) are represented.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting GSD files
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An input source could not be opened or read
    #[error("Failed to read input {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output sink rejected a write
    #[error("Failed to write output: {0}")]
    WriteOutput(#[source] io::Error),

    /// The output file could not be opened
    #[error("Failed to open output file {}: {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output directory could not be created
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input discovery pattern is not a valid glob
    #[error("Invalid input pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A settings file could not be read or written
    #[error("Settings I/O error for {}: {source}", path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A settings file could not be parsed or serialized
    #[error("Invalid settings: {0}")]
    SettingsFormat(#[from] serde_json::Error),

    /// No platform config directory is available
    #[error("Config directory not available")]
    NoConfigDir,
}

impl ConvertError {
    /// True for errors tied to a single input source, which the driver may skip
    pub fn is_input_error(&self) -> bool {
        matches!(self, ConvertError::ReadInput { .. })
    }
}

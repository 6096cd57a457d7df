//! Error types for intake, export and configuration
//!
//! Extraction and rendering never fail; everything that touches the
//! filesystem, an archive or a spreadsheet writer reports through [`StoryError`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for story generation
#[derive(Debug, Error)]
pub enum StoryError {
    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-8 text
    #[error("Cannot decode {path} as UTF-8 text: {message}")]
    Decode { path: PathBuf, message: String },

    /// Input is neither an archive nor a supported script file
    #[error("Unsupported input {path}: expected a .zip archive or one of {expected}")]
    UnsupportedInput { path: PathBuf, expected: String },

    /// Archive entry whose name would resolve outside the extraction directory
    #[error("Unsafe entry '{name}' in archive {archive}")]
    UnsafeEntry { archive: PathBuf, name: String },

    /// Zip archive could not be read or extracted
    #[error("Archive error ({path}): {message}")]
    Archive { path: PathBuf, message: String },

    /// Spreadsheet or CSV writer failed
    #[error("Export error: {message}")]
    Export { message: String },

    /// Configuration is missing or invalid
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl StoryError {
    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Create a decode error
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode { path: path.into(), message: message.into() }
    }

    /// Create an archive error
    pub fn archive(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Archive { path: path.into(), message: message.into() }
    }

    /// Create an unsafe archive entry error
    pub fn unsafe_entry(archive: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self::UnsafeEntry { archive: archive.into(), name: name.into() }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export { message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Whether this error concerns a single input file rather than the whole batch
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::UnsafeEntry { .. })
    }
}

impl From<rust_xlsxwriter::XlsxError> for StoryError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::export(err.to_string())
    }
}

impl From<csv::Error> for StoryError {
    fn from(err: csv::Error) -> Self {
        Self::export(err.to_string())
    }
}

/// Result type alias for story operations
pub type Result<T> = std::result::Result<T, StoryError>;

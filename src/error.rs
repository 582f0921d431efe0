//! Error types for the coverage gates

use std::path::PathBuf;
use thiserror::Error;

/// Result type for coverage operations
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Errors that end a coverage run.
///
/// The `Display` text of each variant is the one-line message shown to the
/// user before the process exits with status 1. Underlying causes are kept
/// as `source` and appended by the alternate `anyhow` format.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// Coverage input file does not exist
    #[error("Invalid input file '{}' provided. The file was not found.", .0.display())]
    MissingFile(PathBuf),

    /// Baseline record does not exist
    #[error("Coverage report not found")]
    MissingBaseline(PathBuf),

    /// Coverage input is not an `.xml` file
    #[error("Invalid input file '{}' provided. The file must be in XML format.", .0.display())]
    InvalidExtension(PathBuf),

    /// XML is malformed or does not have the expected Clover layout
    #[error("Failed to calculate code coverage from '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Baseline record exists but cannot be decoded
    #[error("Failed to read coverage report '{}'", .path.display())]
    InvalidBaseline {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Every aggregated counter is zero
    #[error("Insufficient data for calculation. Please add more code.")]
    InsufficientData,

    /// New coverage fails the acceptance rule
    #[error("{message}")]
    Regression { message: String },

    /// Wrong number of command-line arguments
    #[error("{0}")]
    Usage(String),

    /// IO error
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl CoverageError {
    /// Create a parse error for the given document
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a regression error
    #[must_use]
    pub fn regression(message: impl Into<String>) -> Self {
        Self::Regression {
            message: message.into(),
        }
    }
}

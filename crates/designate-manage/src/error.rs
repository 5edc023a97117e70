//! Error types for the management commands.

use designate_core::ApiError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for management commands.
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors that abort an import.
///
/// Per-line problems are not errors; they are collected in the
/// [`ImportReport`](crate::tlds::ImportReport).
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input file does not exist.
    #[error("TLD Input file Not Found: {0}")]
    InputNotFound(PathBuf),

    /// The input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// The input file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The TLD service failed with something other than a duplicate.
    #[error("TLD service error: {0}")]
    Service(#[from] ApiError),
}

impl ImportError {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

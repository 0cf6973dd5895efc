//! Error types for env-file handling

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading, editing or persisting an env file
#[derive(Debug, Error)]
pub enum EnvFileError {
    /// I/O error with path context
    #[error("I/O error during {operation} on {}: {source}", path.display())]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
    },

    /// An entry that cannot be written as a single `KEY=VALUE` line.
    ///
    /// The value is never included in the message.
    #[error("Invalid entry {key:?}: {reason}")]
    InvalidEntry {
        /// The offending key
        key: String,
        /// Why the entry was rejected
        reason: &'static str,
    },
}

impl EnvFileError {
    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: impl AsRef<Path>, operation: &'static str) -> Self {
        Self::Io {
            source,
            path: path.as_ref().to_path_buf(),
            operation,
        }
    }

    /// Whether this is a read of a file that does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Result type for env-file operations
pub type Result<T> = std::result::Result<T, EnvFileError>;

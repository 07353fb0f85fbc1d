//! Error types for archive access and decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors that can occur while reading or decoding archive entries.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No entry exists at the requested path.
    #[error("archive entry not found: {path}")]
    EntryNotFound {
        /// Normalized path that was requested.
        path: String,
    },

    /// The requested path cannot be mapped onto the store.
    #[error("invalid archive path '{path}': {reason}")]
    InvalidPath {
        /// Path as given by the caller.
        path: String,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// The store's backing file or directory does not exist.
    #[error("archive not found: {path}")]
    ArchiveNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Entry content is malformed.
    #[error("invalid content in '{entry}': {message}")]
    InvalidContent {
        /// Entry (or decoder) the content came from.
        entry: String,
        /// Description of what was invalid.
        message: String,
    },

    /// Binary data ended before a complete record was read.
    #[error("unexpected end of data in '{entry}' at byte {position}")]
    UnexpectedEof {
        /// Entry (or decoder) the data came from.
        entry: String,
        /// Offset at which more data was needed.
        position: usize,
    },

    /// Zip container error.
    #[error("zip error: {message}")]
    Zip {
        /// Error message from the zip reader.
        message: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Create an `InvalidContent` error for the given entry.
    #[must_use]
    pub fn invalid_content(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            entry: entry.into(),
            message: message.into(),
        }
    }

    /// Check whether this error means "no such entry".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::EntryNotFound { .. })
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Zip {
            message: e.to_string(),
        }
    }
}

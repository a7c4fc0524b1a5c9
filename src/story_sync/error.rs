//! Errors raised while importing story files.

use std::io;

use camino::Utf8Path;
use thiserror::Error;

use crate::board::{domain::BoardDomainError, services::BoardServiceError};

/// Failures of a story import.
#[derive(Debug, Error)]
pub enum StorySyncError {
    /// A story file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File or directory that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A story file is not valid JSON of the expected shape.
    #[error("malformed {file}: {message}")]
    Malformed {
        /// Offending file name.
        file: &'static str,
        /// Parser diagnostic.
        message: String,
    },
    /// A card operation failed.
    #[error(transparent)]
    Board(#[from] BoardServiceError),
}

impl StorySyncError {
    pub(crate) fn io(path: &Utf8Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    pub(crate) fn malformed(file: &'static str, err: &serde_json::Error) -> Self {
        Self::Malformed {
            file,
            message: err.to_string(),
        }
    }
}

impl From<BoardDomainError> for StorySyncError {
    fn from(err: BoardDomainError) -> Self {
        Self::Board(err.into())
    }
}

/// Result type for story imports.
pub type StorySyncResult<T> = Result<T, StorySyncError>;

//! Service-level errors and their stable wire codes.

use crate::board::{
    domain::{BoardDomainError, CardId},
    ports::BoardRepositoryError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] BoardRepositoryError),
    /// The named column is not registered on the board.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    /// No card with the identifier exists on the board.
    #[error("card {0} not found")]
    CardNotFound(CardId),
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Stable failure categories reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Referenced column does not exist on the board.
    UnknownColumn,
    /// Column name already exists on the board.
    DuplicateColumn,
    /// Referenced card does not exist on the board.
    CardNotFound,
    /// Move into `blocked` without both responsibility fields.
    MissingBlockMetadata,
    /// Blank or malformed search input.
    InvalidQuery,
    /// External link already attached to another card.
    DuplicateExternalLink,
    /// Any other malformed argument.
    InvalidArgument,
    /// Underlying persistence failed; the call may be retried.
    StorageFailure,
}

impl ErrorKind {
    /// Returns the wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownColumn => "UNKNOWN_COLUMN",
            Self::DuplicateColumn => "DUPLICATE_COLUMN",
            Self::CardNotFound => "CARD_NOT_FOUND",
            Self::MissingBlockMetadata => "MISSING_BLOCK_METADATA",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::DuplicateExternalLink => "DUPLICATE_EXTERNAL_LINK",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::StorageFailure => "STORAGE_FAILURE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl BoardServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownColumn(_) => ErrorKind::UnknownColumn,
            Self::CardNotFound(_)
            | Self::Domain(BoardDomainError::InvalidCardId(_))
            | Self::Repository(BoardRepositoryError::CardNotFound(_)) => ErrorKind::CardNotFound,
            Self::Domain(BoardDomainError::MissingBlockMetadata { .. }) => {
                ErrorKind::MissingBlockMetadata
            }
            Self::Domain(
                BoardDomainError::BlankSearchQuery
                | BoardDomainError::UnknownSearchField(_)
                | BoardDomainError::InvalidSearchLimit(_),
            ) => ErrorKind::InvalidQuery,
            Self::Domain(_) => ErrorKind::InvalidArgument,
            Self::Repository(BoardRepositoryError::DuplicateColumn { .. }) => {
                ErrorKind::DuplicateColumn
            }
            Self::Repository(BoardRepositoryError::DuplicateExternalLink { .. }) => {
                ErrorKind::DuplicateExternalLink
            }
            Self::Repository(
                BoardRepositoryError::DuplicateBoard(_)
                | BoardRepositoryError::DuplicateCard(_)
                | BoardRepositoryError::Persistence(_),
            ) => ErrorKind::StorageFailure,
        }
    }
}

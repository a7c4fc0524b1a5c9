//! Error types for board domain validation and parsing.

use super::CardId;
use thiserror::Error;

/// Errors returned while constructing or mutating board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The board key is empty after trimming.
    #[error("board key must not be empty")]
    EmptyBoardKey,

    /// The column name is empty after trimming.
    #[error("column name must not be empty")]
    EmptyColumnName,

    /// The column name exceeds the storage limit.
    #[error("column name exceeds 64 character limit: {0}")]
    ColumnNameTooLong(String),

    /// The card title is empty after trimming.
    #[error("card title must not be empty")]
    EmptyCardTitle,

    /// Only one half of an external link was supplied.
    #[error("external_type and external_id must be provided together")]
    IncompleteExternalLink,

    /// The card identifier is not a valid UUID.
    #[error("invalid card identifier: {0}")]
    InvalidCardId(String),

    /// Entering the `blocked` column requires both responsibility fields.
    #[error("card {card_id} cannot enter 'blocked' without blocked_by and blocked_reason")]
    MissingBlockMetadata {
        /// Card that was not moved.
        card_id: CardId,
    },

    /// The search query is blank after trimming.
    #[error("search query must not be empty")]
    BlankSearchQuery,

    /// The search names a field that cannot be searched.
    #[error(transparent)]
    UnknownSearchField(#[from] ParseSearchFieldError),

    /// The search limit must be positive.
    #[error("search limit must be a positive integer, got {0}")]
    InvalidSearchLimit(i64),

    /// A WIP limit must be positive when set.
    #[error("wip_limit must be a positive integer, got {0}")]
    InvalidWipLimit(i64),
}

/// Error returned while parsing search field names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown search field: {0}")]
pub struct ParseSearchFieldError(pub String);

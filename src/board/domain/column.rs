//! Column names, column records, and the default column set.

use super::{BoardDomainError, BoardId, ColumnId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a column name.
const MAX_COLUMN_NAME_LENGTH: usize = 64;

/// Name of the column whose entry is governed by block metadata.
pub const BLOCKED_COLUMN: &str = "blocked";

/// Columns seeded on every new board, in position order.
pub const DEFAULT_COLUMNS: [&str; 6] = [
    "backlog",
    "current_sprint",
    "in_progress",
    BLOCKED_COLUMN,
    "done",
    "archived",
];

/// Validated column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    /// Creates a validated column name.
    ///
    /// Surrounding whitespace is trimmed; case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnName`] for blank input or
    /// [`BoardDomainError::ColumnNameTooLong`] when the trimmed name exceeds
    /// 64 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyColumnName);
        }
        if trimmed.chars().count() > MAX_COLUMN_NAME_LENGTH {
            return Err(BoardDomainError::ColumnNameTooLong(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the `blocked` column name.
    #[must_use]
    pub fn blocked() -> Self {
        Self(BLOCKED_COLUMN.to_owned())
    }

    /// Returns whether this is the governed `blocked` column.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.0 == BLOCKED_COLUMN
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ColumnName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Optional work-in-progress limit. Reported, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WipLimit(u32);

impl WipLimit {
    /// Creates a validated WIP limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidWipLimit`] unless the value is in
    /// `1..=u32::MAX`.
    pub fn new(value: i64) -> Result<Self, BoardDomainError> {
        u32::try_from(value)
            .ok()
            .filter(|limit| *limit > 0)
            .map(Self)
            .ok_or(BoardDomainError::InvalidWipLimit(value))
    }

    /// Returns the numeric limit.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// A named lane on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    board_id: BoardId,
    name: ColumnName,
    position: u32,
    wip_limit: Option<WipLimit>,
}

impl Column {
    /// Creates a column at the given position.
    #[must_use]
    pub fn new(
        board_id: BoardId,
        name: ColumnName,
        position: u32,
        wip_limit: Option<WipLimit>,
    ) -> Self {
        Self {
            id: ColumnId::new(),
            board_id,
            name,
            position,
            wip_limit,
        }
    }

    /// Builds the six default columns for a freshly created board.
    #[must_use]
    pub fn defaults_for(board_id: BoardId) -> Vec<Self> {
        (0_u32..)
            .zip(DEFAULT_COLUMNS)
            .map(|(position, name)| {
                Self::new(board_id, ColumnName(name.to_owned()), position, None)
            })
            .collect()
    }

    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ColumnId,
        board_id: BoardId,
        name: ColumnName,
        position: u32,
        wip_limit: Option<WipLimit>,
    ) -> Self {
        Self {
            id,
            board_id,
            name,
            position,
            wip_limit,
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the owning board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the column name.
    #[must_use]
    pub const fn name(&self) -> &ColumnName {
        &self.name
    }

    /// Returns the 0-based ordering position.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Returns the informational WIP limit, if any.
    #[must_use]
    pub const fn wip_limit(&self) -> Option<WipLimit> {
        self.wip_limit
    }
}

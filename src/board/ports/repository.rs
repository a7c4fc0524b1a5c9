//! Repository port for board, column, and card persistence.

use crate::board::domain::{
    Board, BoardId, BoardKey, Card, CardId, Column, ColumnName, ExternalLink,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Board persistence contract.
///
/// Every method is a single atomic unit: implementations must never expose
/// a half-applied write to a later call.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Finds a board by key.
    ///
    /// Returns `None` when no board has been created under the key.
    async fn find_board_by_key(&self, key: &BoardKey) -> BoardRepositoryResult<Option<Board>>;

    /// Stores a new board together with its initial columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateBoard`] when the key is
    /// already taken. Nothing is written in that case.
    async fn store_board(&self, board: &Board, columns: &[Column]) -> BoardRepositoryResult<()>;

    /// Returns the board's columns ordered by position.
    async fn list_columns(&self, board_id: BoardId) -> BoardRepositoryResult<Vec<Column>>;

    /// Stores a new column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateColumn`] when the board
    /// already has a column with the same name.
    async fn store_column(&self, column: &Column) -> BoardRepositoryResult<()>;

    /// Stores a new card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateCard`] when the identifier
    /// exists or [`BoardRepositoryError::DuplicateExternalLink`] when the
    /// board already has a card with the same external link.
    async fn store_card(&self, card: &Card) -> BoardRepositoryResult<()>;

    /// Replaces the persisted state of an existing card in one write.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::CardNotFound`] when the card does not
    /// exist on its board.
    async fn update_card(&self, card: &Card) -> BoardRepositoryResult<()>;

    /// Finds a card on a board by identifier.
    async fn find_card(
        &self,
        board_id: BoardId,
        card_id: CardId,
    ) -> BoardRepositoryResult<Option<Card>>;

    /// Finds the card on a board carrying the given external link.
    async fn find_card_by_external_link(
        &self,
        board_id: BoardId,
        link: &ExternalLink,
    ) -> BoardRepositoryResult<Option<Card>>;

    /// Lists cards on a board in insertion order, optionally filtered to one
    /// column.
    async fn list_cards(
        &self,
        board_id: BoardId,
        column: Option<ColumnName>,
    ) -> BoardRepositoryResult<Vec<Card>>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// A board with the same key already exists.
    #[error("duplicate board key: {0}")]
    DuplicateBoard(BoardKey),

    /// A column with the same name already exists on the board.
    #[error("column '{name}' already exists on board {board_id}")]
    DuplicateColumn {
        /// Owning board.
        board_id: BoardId,
        /// Conflicting column name.
        name: ColumnName,
    },

    /// A card with the same identifier already exists.
    #[error("duplicate card identifier: {0}")]
    DuplicateCard(CardId),

    /// A card with the same external link already exists on the board.
    #[error("external link {external_type}:{external_id} is already attached to a card")]
    DuplicateExternalLink {
        /// Conflicting link type.
        external_type: String,
        /// Conflicting link identifier.
        external_id: String,
    },

    /// The card was not found.
    #[error("card not found: {0}")]
    CardNotFound(CardId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a duplicate-link error from the conflicting link.
    #[must_use]
    pub fn duplicate_link(link: &ExternalLink) -> Self {
        Self::DuplicateExternalLink {
            external_type: link.external_type().to_owned(),
            external_id: link.external_id().to_owned(),
        }
    }
}

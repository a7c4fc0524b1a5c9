//! Board and column management.

use super::{BoardServiceError, BoardServiceResult};
use crate::board::{
    domain::{Board, BoardKey, Column, ColumnName, UserKey, WipLimit},
    ports::{BoardRepository, BoardRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for appending a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddColumnRequest {
    name: String,
    wip_limit: Option<i64>,
}

impl AddColumnRequest {
    /// Creates a request for a column without a WIP limit.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wip_limit: None,
        }
    }

    /// Sets the informational WIP limit.
    #[must_use]
    pub const fn with_wip_limit(mut self, wip_limit: i64) -> Self {
        self.wip_limit = Some(wip_limit);
        self
    }
}

/// Board and column orchestration service.
#[derive(Clone)]
pub struct BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the board for `key`, creating it with the default columns on
    /// first use.
    ///
    /// Safe to call on every request: an existing board is returned as-is
    /// and its columns are never re-seeded.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when persistence fails.
    pub async fn ensure_board(
        &self,
        key: &BoardKey,
        user_key: &UserKey,
    ) -> BoardServiceResult<Board> {
        if let Some(board) = self.repository.find_board_by_key(key).await? {
            return Ok(board);
        }

        let board = Board::new(key.clone(), user_key.clone(), &*self.clock);
        let columns = Column::defaults_for(board.id());
        match self.repository.store_board(&board, &columns).await {
            Ok(()) => {
                tracing::info!(
                    board_id = %board.id(),
                    board_key = %key,
                    created_by = %user_key,
                    "created board with default columns"
                );
                Ok(board)
            }
            Err(BoardRepositoryError::DuplicateBoard(_)) => self
                .repository
                .find_board_by_key(key)
                .await?
                .ok_or_else(|| BoardRepositoryError::DuplicateBoard(key.clone()).into()),
            Err(err) => Err(err.into()),
        }
    }

    /// Appends a column after the board's last column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for an invalid name or WIP
    /// limit, and [`BoardRepositoryError::DuplicateColumn`] when the name is
    /// already registered.
    pub async fn add_column(
        &self,
        board: &Board,
        request: AddColumnRequest,
    ) -> BoardServiceResult<Column> {
        let name = ColumnName::new(request.name)?;
        let wip_limit = request.wip_limit.map(WipLimit::new).transpose()?;

        let existing = self.repository.list_columns(board.id()).await?;
        if existing.iter().any(|column| column.name() == &name) {
            return Err(BoardRepositoryError::DuplicateColumn {
                board_id: board.id(),
                name,
            }
            .into());
        }
        let position = existing
            .iter()
            .map(Column::position)
            .max()
            .map_or(0, |last| last.saturating_add(1));

        let column = Column::new(board.id(), name, position, wip_limit);
        self.repository.store_column(&column).await?;
        tracing::info!(
            board_id = %board.id(),
            column = %column.name(),
            position,
            "added column"
        );
        Ok(column)
    }

    /// Resolves a column name registered on the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::UnknownColumn`] when no column with the
    /// (trimmed) name exists.
    pub async fn resolve_column(&self, board: &Board, name: &str) -> BoardServiceResult<Column> {
        let Ok(wanted) = ColumnName::new(name) else {
            return Err(BoardServiceError::UnknownColumn(name.to_owned()));
        };
        self.repository
            .list_columns(board.id())
            .await?
            .into_iter()
            .find(|column| column.name() == &wanted)
            .ok_or_else(|| BoardServiceError::UnknownColumn(wanted.as_str().to_owned()))
    }

    /// Lists the board's columns in position order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when persistence fails.
    pub async fn list_columns(&self, board: &Board) -> BoardServiceResult<Vec<Column>> {
        Ok(self.repository.list_columns(board.id()).await?)
    }
}

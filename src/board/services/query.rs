//! Read-side operations: listings, search and board summaries.

use super::{BoardService, BoardServiceResult};
use crate::board::{
    domain::{Board, Card, Column, SearchQuery},
    ports::BoardRepository,
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;

/// Request payload for a card search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCardsRequest {
    query: String,
    fields: Vec<String>,
    limit: Option<i64>,
}

impl SearchCardsRequest {
    /// Creates a search over the default fields.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Restricts the search to the named fields.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A column together with the number of cards it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    /// The column.
    pub column: Column,
    /// Cards currently in the column.
    pub card_count: usize,
}

/// Snapshot of a board's layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardInfo {
    /// The board.
    pub board: Board,
    /// Columns in position order.
    pub columns: Vec<ColumnSummary>,
}

/// Card query service.
#[derive(Clone)]
pub struct CardQueryService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    boards: BoardService<R, C>,
}

impl<R, C> CardQueryService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new query service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        let boards = BoardService::new(Arc::clone(&repository), clock);
        Self { repository, boards }
    }

    /// Lists cards in insertion order, optionally restricted to one column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::UnknownColumn`](super::BoardServiceError::UnknownColumn)
    /// when the filter names an unregistered column.
    pub async fn list_cards(
        &self,
        board: &Board,
        column: Option<&str>,
    ) -> BoardServiceResult<Vec<Card>> {
        let filter = match column {
            Some(name) => Some(self.boards.resolve_column(board, name).await?.name().clone()),
            None => None,
        };
        Ok(self.repository.list_cards(board.id(), filter).await?)
    }

    /// Returns up to `limit` cards whose selected fields contain the query,
    /// case-insensitively, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a domain error for a blank query, an unknown field, or a
    /// non-positive limit.
    pub async fn search_cards(
        &self,
        board: &Board,
        request: SearchCardsRequest,
    ) -> BoardServiceResult<Vec<Card>> {
        let mut query = SearchQuery::new(&request.query)?.with_field_names(&request.fields)?;
        if let Some(limit) = request.limit {
            query = query.with_limit(limit)?;
        }
        let cards = self.repository.list_cards(board.id(), None).await?;
        Ok(cards
            .into_iter()
            .filter(|card| query.matches(card))
            .take(query.limit())
            .collect())
    }

    /// Summarizes the board's columns with their card counts.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`](super::BoardServiceError::Repository)
    /// when persistence fails.
    pub async fn board_info(&self, board: &Board) -> BoardServiceResult<BoardInfo> {
        let columns = self.repository.list_columns(board.id()).await?;
        let cards = self.repository.list_cards(board.id(), None).await?;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for card in &cards {
            *counts.entry(card.column().as_str()).or_default() += 1;
        }
        let summaries = columns
            .into_iter()
            .map(|column| {
                let card_count = counts.get(column.name().as_str()).copied().unwrap_or(0);
                ColumnSummary { column, card_count }
            })
            .collect();
        Ok(BoardInfo {
            board: board.clone(),
            columns: summaries,
        })
    }
}

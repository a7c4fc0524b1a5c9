//! In-memory repository for board tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{Board, BoardId, BoardKey, Card, CardId, Column, ColumnName, ExternalLink},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};

/// Thread-safe in-memory board repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    boards: HashMap<BoardKey, Board>,
    columns: HashMap<BoardId, Vec<Column>>,
    /// Cards in insertion order.
    cards: Vec<Card>,
    card_index: HashMap<CardId, usize>,
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BoardRepositoryResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state.read().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> BoardRepositoryResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state.write().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryBoardState {
    fn card_position(&self, board_id: BoardId, card_id: CardId) -> Option<usize> {
        self.card_index
            .get(&card_id)
            .copied()
            .filter(|position| {
                self.cards
                    .get(*position)
                    .is_some_and(|card| card.board_id() == board_id)
            })
    }

    fn conflicting_link<'card>(&self, card: &'card Card) -> Option<&'card ExternalLink> {
        card.external_link().filter(|link| {
            self.cards.iter().any(|existing| {
                existing.board_id() == card.board_id()
                    && existing.id() != card.id()
                    && existing.external_link() == Some(*link)
            })
        })
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn find_board_by_key(&self, key: &BoardKey) -> BoardRepositoryResult<Option<Board>> {
        Ok(self.read()?.boards.get(key).cloned())
    }

    async fn store_board(&self, board: &Board, columns: &[Column]) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        if state.boards.contains_key(board.key()) {
            return Err(BoardRepositoryError::DuplicateBoard(board.key().clone()));
        }
        state.boards.insert(board.key().clone(), board.clone());
        state.columns.insert(board.id(), columns.to_vec());
        Ok(())
    }

    async fn list_columns(&self, board_id: BoardId) -> BoardRepositoryResult<Vec<Column>> {
        let state = self.read()?;
        let mut columns = state.columns.get(&board_id).cloned().unwrap_or_default();
        columns.sort_by_key(Column::position);
        Ok(columns)
    }

    async fn store_column(&self, column: &Column) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        let columns = state.columns.entry(column.board_id()).or_default();
        if columns.iter().any(|existing| existing.name() == column.name()) {
            return Err(BoardRepositoryError::DuplicateColumn {
                board_id: column.board_id(),
                name: column.name().clone(),
            });
        }
        columns.push(column.clone());
        Ok(())
    }

    async fn store_card(&self, card: &Card) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        if state.card_index.contains_key(&card.id()) {
            return Err(BoardRepositoryError::DuplicateCard(card.id()));
        }
        if let Some(link) = state.conflicting_link(card) {
            return Err(BoardRepositoryError::duplicate_link(link));
        }
        let position = state.cards.len();
        state.cards.push(card.clone());
        state.card_index.insert(card.id(), position);
        Ok(())
    }

    async fn update_card(&self, card: &Card) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        let position = state
            .card_position(card.board_id(), card.id())
            .ok_or(BoardRepositoryError::CardNotFound(card.id()))?;
        let slot = state
            .cards
            .get_mut(position)
            .ok_or(BoardRepositoryError::CardNotFound(card.id()))?;
        *slot = card.clone();
        Ok(())
    }

    async fn find_card(
        &self,
        board_id: BoardId,
        card_id: CardId,
    ) -> BoardRepositoryResult<Option<Card>> {
        let state = self.read()?;
        Ok(state
            .card_position(board_id, card_id)
            .and_then(|position| state.cards.get(position))
            .cloned())
    }

    async fn find_card_by_external_link(
        &self,
        board_id: BoardId,
        link: &ExternalLink,
    ) -> BoardRepositoryResult<Option<Card>> {
        let state = self.read()?;
        Ok(state
            .cards
            .iter()
            .find(|card| card.board_id() == board_id && card.external_link() == Some(link))
            .cloned())
    }

    async fn list_cards(
        &self,
        board_id: BoardId,
        column: Option<ColumnName>,
    ) -> BoardRepositoryResult<Vec<Card>> {
        let state = self.read()?;
        Ok(state
            .cards
            .iter()
            .filter(|card| card.board_id() == board_id)
            .filter(|card| column.as_ref().is_none_or(|name| card.column() == name))
            .cloned()
            .collect())
    }
}

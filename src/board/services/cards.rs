//! Card lifecycle orchestration: creation, field edits and governed moves.

use super::{BoardService, BoardServiceError, BoardServiceResult};
use crate::board::{
    domain::{
        BlockMetadata, Board, Card, CardFields, CardId, CardPatch, ColumnName, ExternalLink,
        UserKey,
    },
    ports::BoardRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddCardRequest {
    column: String,
    title: String,
    description: Option<String>,
    assignee: Option<String>,
    priority: Option<String>,
    external_type: Option<String>,
    external_id: Option<String>,
    blocked_by: Option<String>,
    blocked_reason: Option<String>,
}

impl AddCardRequest {
    /// Creates a request for a card titled `title` in `column`.
    #[must_use]
    pub fn new(column: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Attaches an external back-reference.
    #[must_use]
    pub fn with_external_link(
        mut self,
        external_type: impl Into<String>,
        external_id: impl Into<String>,
    ) -> Self {
        self.external_type = Some(external_type.into());
        self.external_id = Some(external_id.into());
        self
    }

    /// Sets raw optional link parts as received from a caller.
    #[must_use]
    pub fn with_optional_link(
        mut self,
        external_type: Option<String>,
        external_id: Option<String>,
    ) -> Self {
        self.external_type = external_type;
        self.external_id = external_id;
        self
    }

    /// Sets block responsibility, used only when `column` is `blocked`.
    #[must_use]
    pub fn with_block(
        mut self,
        blocked_by: Option<String>,
        blocked_reason: Option<String>,
    ) -> Self {
        self.blocked_by = blocked_by;
        self.blocked_reason = blocked_reason;
        self
    }

    fn into_fields(self) -> Result<(CardFields, String), BoardServiceError> {
        let mut fields = CardFields::new(self.title)?;
        if let Some(description) = self.description {
            fields = fields.with_description(description);
        }
        if let Some(assignee) = self.assignee {
            fields = fields.with_assignee(assignee);
        }
        if let Some(priority) = self.priority {
            fields = fields.with_priority(priority);
        }
        Ok((fields, self.column))
    }
}

/// Request payload for moving a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCardRequest {
    card_id: CardId,
    target_column: String,
    user_key: UserKey,
    blocked_by: Option<String>,
    blocked_reason: Option<String>,
}

impl MoveCardRequest {
    /// Creates a move request attributed to `user_key`.
    #[must_use]
    pub fn new(card_id: CardId, target_column: impl Into<String>, user_key: UserKey) -> Self {
        Self {
            card_id,
            target_column: target_column.into(),
            user_key,
            blocked_by: None,
            blocked_reason: None,
        }
    }

    /// Sets block responsibility for a move into `blocked`.
    #[must_use]
    pub fn with_block(
        mut self,
        blocked_by: Option<String>,
        blocked_reason: Option<String>,
    ) -> Self {
        self.blocked_by = blocked_by;
        self.blocked_reason = blocked_reason;
        self
    }
}

/// Outcome of a successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedCard {
    /// Card after the move.
    pub card: Card,
    /// Column the card left.
    pub from: ColumnName,
}

/// Card lifecycle orchestration service.
#[derive(Clone)]
pub struct CardLifecycleService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    boards: BoardService<R, C>,
}

impl<R, C> CardLifecycleService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new card lifecycle service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        let boards = BoardService::new(Arc::clone(&repository), Arc::clone(&clock));
        Self {
            repository,
            clock,
            boards,
        }
    }

    /// Creates a card in an existing column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::UnknownColumn`] for an unregistered
    /// column, a domain error for a blank title, a half-supplied link or a
    /// `blocked` column without responsibility, and a repository error for a
    /// duplicate external link.
    pub async fn add_card(
        &self,
        board: &Board,
        request: AddCardRequest,
    ) -> BoardServiceResult<Card> {
        let link = ExternalLink::from_optional(
            request.external_type.as_deref(),
            request.external_id.as_deref(),
        )?;
        let block = BlockMetadata::from_optional(
            request.blocked_by.as_deref(),
            request.blocked_reason.as_deref(),
        );
        let (fields, column_name) = request.into_fields()?;
        let column = self.boards.resolve_column(board, &column_name).await?;

        let card = Card::new(
            board.id(),
            column.name().clone(),
            fields,
            link,
            block,
            &*self.clock,
        )?;
        self.repository.store_card(&card).await?;
        tracing::info!(
            card_id = %card.id(),
            board_id = %board.id(),
            column = %card.column(),
            "created card"
        );
        Ok(card)
    }

    /// Applies a partial field update. An empty patch returns the card
    /// unchanged without touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::CardNotFound`] when the card does not
    /// exist and a domain error when the patch would blank the title.
    pub async fn update_card(
        &self,
        board: &Board,
        card_id: CardId,
        patch: CardPatch,
    ) -> BoardServiceResult<Card> {
        let mut card = self.find_card(board, card_id).await?;
        if card.apply_patch(patch, &*self.clock)? {
            self.repository.update_card(&card).await?;
            tracing::debug!(card_id = %card_id, "updated card fields");
        }
        Ok(card)
    }

    /// Moves a card to another column under the blocked-column contract.
    ///
    /// Nothing is persisted unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::CardNotFound`],
    /// [`BoardServiceError::UnknownColumn`], or a domain error when a move
    /// into `blocked` lacks responsibility metadata.
    pub async fn move_card(
        &self,
        board: &Board,
        request: MoveCardRequest,
    ) -> BoardServiceResult<MovedCard> {
        let MoveCardRequest {
            card_id,
            target_column,
            user_key,
            blocked_by,
            blocked_reason,
        } = request;
        let mut card = self.find_card(board, card_id).await?;
        let target = self.boards.resolve_column(board, &target_column).await?;
        let block = BlockMetadata::from_optional(blocked_by.as_deref(), blocked_reason.as_deref());

        let movement = card.move_to(target.name().clone(), block, user_key, &*self.clock)?;
        self.repository.update_card(&card).await?;
        tracing::info!(
            card_id = %card_id,
            from = %movement.from,
            to = %movement.to,
            moved_by = card.last_moved_by().map_or("", UserKey::as_str),
            blocked_by = card.blocked().map_or("", |state| state.blocked_by()),
            "moved card"
        );
        Ok(MovedCard {
            card,
            from: movement.from,
        })
    }

    /// Loads a card on the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::CardNotFound`] when absent.
    pub async fn find_card(&self, board: &Board, card_id: CardId) -> BoardServiceResult<Card> {
        self.repository
            .find_card(board.id(), card_id)
            .await?
            .ok_or(BoardServiceError::CardNotFound(card_id))
    }

    /// Looks up the card carrying `link`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when persistence fails.
    pub async fn find_by_external_link(
        &self,
        board: &Board,
        link: &ExternalLink,
    ) -> BoardServiceResult<Option<Card>> {
        Ok(self
            .repository
            .find_card_by_external_link(board.id(), link)
            .await?)
    }
}

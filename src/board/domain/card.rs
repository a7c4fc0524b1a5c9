//! Card aggregate root and the blocked-transition state machine.
//!
//! A card's state is the name of the column it occupies. Every column is a
//! legal target except that entering [`BLOCKED_COLUMN`](super::BLOCKED_COLUMN)
//! requires [`BlockMetadata`]. Block responsibility lives in a single
//! `Option<BlockedState>` so `blocked_by`, `blocked_reason` and
//! `blocked_since` are always present or absent together, and present
//! exactly while the card sits in `blocked`.

use super::{BoardDomainError, BoardId, CardId, ColumnName, UserKey};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Editable text fields of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFields {
    title: String,
    description: String,
    assignee: String,
    priority: String,
}

impl CardFields {
    /// Creates card fields with a required title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyCardTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            title: validate_title(title.into())?,
            ..Self::default()
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    /// Sets the priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assignee.
    #[must_use]
    pub fn assignee(&self) -> &str {
        &self.assignee
    }

    /// Returns the priority label.
    #[must_use]
    pub fn priority(&self) -> &str {
        &self.priority
    }
}

fn validate_title(title: String) -> Result<String, BoardDomainError> {
    if title.trim().is_empty() {
        return Err(BoardDomainError::EmptyCardTitle);
    }
    Ok(title)
}

/// Partial update of [`CardFields`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement assignee.
    pub assignee: Option<String>,
    /// Replacement priority label.
    pub priority: Option<String>,
}

impl CardPatch {
    /// Returns whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assignee.is_none()
            && self.priority.is_none()
    }
}

/// Opaque back-reference to an entity outside the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalLink {
    external_type: String,
    external_id: String,
}

impl ExternalLink {
    /// Creates an external link.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::IncompleteExternalLink`] when either part
    /// is blank.
    pub fn new(
        external_type: impl Into<String>,
        external_id: impl Into<String>,
    ) -> Result<Self, BoardDomainError> {
        let link_type = external_type.into().trim().to_owned();
        let link_id = external_id.into().trim().to_owned();
        if link_type.is_empty() || link_id.is_empty() {
            return Err(BoardDomainError::IncompleteExternalLink);
        }
        Ok(Self {
            external_type: link_type,
            external_id: link_id,
        })
    }

    /// Builds a link from optional caller input.
    ///
    /// Two absent (or blank) parts mean "no link".
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::IncompleteExternalLink`] when exactly one
    /// part is supplied.
    pub fn from_optional(
        external_type: Option<&str>,
        external_id: Option<&str>,
    ) -> Result<Option<Self>, BoardDomainError> {
        let link_type = external_type.map(str::trim).filter(|value| !value.is_empty());
        let link_id = external_id.map(str::trim).filter(|value| !value.is_empty());
        match (link_type, link_id) {
            (None, None) => Ok(None),
            (Some(kind), Some(id)) => Self::new(kind, id).map(Some),
            _ => Err(BoardDomainError::IncompleteExternalLink),
        }
    }

    /// Returns the external entity type.
    #[must_use]
    pub fn external_type(&self) -> &str {
        &self.external_type
    }

    /// Returns the external entity identifier.
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }
}

/// Responsibility metadata required to enter `blocked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetadata {
    blocked_by: String,
    reason: String,
}

impl BlockMetadata {
    /// Builds metadata when both parts are present and non-blank.
    #[must_use]
    pub fn from_optional(blocked_by: Option<&str>, reason: Option<&str>) -> Option<Self> {
        let by = blocked_by.map(str::trim).filter(|value| !value.is_empty())?;
        let why = reason.map(str::trim).filter(|value| !value.is_empty())?;
        Some(Self {
            blocked_by: by.to_owned(),
            reason: why.to_owned(),
        })
    }

    /// Returns the responsible party.
    #[must_use]
    pub fn blocked_by(&self) -> &str {
        &self.blocked_by
    }

    /// Returns the stated reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Block episode attached to a card in `blocked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedState {
    blocked_by: String,
    reason: String,
    since: DateTime<Utc>,
}

impl BlockedState {
    /// Reconstructs a block episode from persisted storage.
    #[must_use]
    pub const fn from_persisted(blocked_by: String, reason: String, since: DateTime<Utc>) -> Self {
        Self {
            blocked_by,
            reason,
            since,
        }
    }

    fn start(metadata: BlockMetadata, since: DateTime<Utc>) -> Self {
        Self {
            blocked_by: metadata.blocked_by,
            reason: metadata.reason,
            since,
        }
    }

    /// Returns the responsible party.
    #[must_use]
    pub fn blocked_by(&self) -> &str {
        &self.blocked_by
    }

    /// Returns the stated reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns when the episode started.
    #[must_use]
    pub const fn since(&self) -> DateTime<Utc> {
        self.since
    }
}

/// Columns involved in a successful move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMove {
    /// Column the card left.
    pub from: ColumnName,
    /// Column the card entered.
    pub to: ColumnName,
}

/// Card aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    board_id: BoardId,
    column: ColumnName,
    fields: CardFields,
    external_link: Option<ExternalLink>,
    blocked: Option<BlockedState>,
    last_moved_by: Option<UserKey>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted card aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCardData {
    /// Persisted card identifier.
    pub id: CardId,
    /// Owning board.
    pub board_id: BoardId,
    /// Current column.
    pub column: ColumnName,
    /// Editable fields.
    pub fields: CardFields,
    /// External back-reference, if any.
    pub external_link: Option<ExternalLink>,
    /// Block episode, if the card is blocked.
    pub blocked: Option<BlockedState>,
    /// Caller that last moved the card.
    pub last_moved_by: Option<UserKey>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Creates a card in `column`.
    ///
    /// Cards created directly in `blocked` obey the same contract as cards
    /// moved there: `block` must be present and the episode starts now.
    /// Block metadata is ignored for every other column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::MissingBlockMetadata`] when `column` is
    /// `blocked` and `block` is `None`.
    pub fn new(
        board_id: BoardId,
        column: ColumnName,
        fields: CardFields,
        external_link: Option<ExternalLink>,
        block: Option<BlockMetadata>,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let id = CardId::new();
        let timestamp = clock.utc();
        let blocked = if column.is_blocked() {
            let metadata = block.ok_or(BoardDomainError::MissingBlockMetadata { card_id: id })?;
            Some(BlockedState::start(metadata, timestamp))
        } else {
            None
        };

        Ok(Self {
            id,
            board_id,
            column,
            fields,
            external_link,
            blocked,
            last_moved_by: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a card from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCardData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            column: data.column,
            fields: data.fields,
            external_link: data.external_link,
            blocked: data.blocked,
            last_moved_by: data.last_moved_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn id(&self) -> CardId {
        self.id
    }

    /// Returns the owning board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the current column.
    #[must_use]
    pub const fn column(&self) -> &ColumnName {
        &self.column
    }

    /// Returns the editable fields.
    #[must_use]
    pub const fn fields(&self) -> &CardFields {
        &self.fields
    }

    /// Returns the external back-reference, if any.
    #[must_use]
    pub const fn external_link(&self) -> Option<&ExternalLink> {
        self.external_link.as_ref()
    }

    /// Returns the current block episode, if any.
    #[must_use]
    pub const fn blocked(&self) -> Option<&BlockedState> {
        self.blocked.as_ref()
    }

    /// Returns the caller that last moved the card.
    #[must_use]
    pub const fn last_moved_by(&self) -> Option<&UserKey> {
        self.last_moved_by.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the card to `target`.
    ///
    /// - Entering `blocked` requires `block` and starts a new episode.
    /// - `blocked` to `blocked` replaces the responsibility fields and keeps
    ///   the original `since`.
    /// - Any other target clears the block episode; `block` is ignored.
    ///
    /// The card is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::MissingBlockMetadata`] when `target` is
    /// `blocked` and `block` is `None`.
    pub fn move_to(
        &mut self,
        target: ColumnName,
        block: Option<BlockMetadata>,
        actor: UserKey,
        clock: &impl Clock,
    ) -> Result<CardMove, BoardDomainError> {
        let timestamp = clock.utc();
        let next_blocked = if target.is_blocked() {
            let metadata =
                block.ok_or(BoardDomainError::MissingBlockMetadata { card_id: self.id })?;
            let since = self
                .blocked
                .as_ref()
                .map_or(timestamp, BlockedState::since);
            Some(BlockedState::start(metadata, since))
        } else {
            None
        };

        let from = std::mem::replace(&mut self.column, target.clone());
        self.blocked = next_blocked;
        self.last_moved_by = Some(actor);
        self.updated_at = timestamp;
        Ok(CardMove { from, to: target })
    }

    /// Applies a field patch. Column and block state are never touched.
    ///
    /// Returns `false` when the patch is empty and nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyCardTitle`] when the patch would
    /// blank the title; the card is left untouched.
    pub fn apply_patch(
        &mut self,
        patch: CardPatch,
        clock: &impl Clock,
    ) -> Result<bool, BoardDomainError> {
        if patch.is_empty() {
            return Ok(false);
        }
        let CardPatch {
            title,
            description,
            assignee,
            priority,
        } = patch;
        let validated_title = title.map(validate_title).transpose()?;

        if let Some(new_title) = validated_title {
            self.fields.title = new_title;
        }
        if let Some(new_description) = description {
            self.fields.description = new_description;
        }
        if let Some(new_assignee) = assignee {
            self.fields.assignee = new_assignee;
        }
        if let Some(new_priority) = priority {
            self.fields.priority = new_priority;
        }
        self.updated_at = clock.utc();
        Ok(true)
    }
}

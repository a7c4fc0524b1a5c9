//! Board record.

use super::{BoardId, BoardKey, UserKey};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Top-level container for columns and cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    key: BoardKey,
    created_by: UserKey,
    created_at: DateTime<Utc>,
}

impl Board {
    /// Creates a new board addressed by `key`.
    #[must_use]
    pub fn new(key: BoardKey, created_by: UserKey, clock: &impl Clock) -> Self {
        Self {
            id: BoardId::new(),
            key,
            created_by,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a board from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: BoardId,
        key: BoardKey,
        created_by: UserKey,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            key,
            created_by,
            created_at,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board key.
    #[must_use]
    pub const fn key(&self) -> &BoardKey {
        &self.key
    }

    /// Returns the caller that first touched the board.
    #[must_use]
    pub const fn created_by(&self) -> &UserKey {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

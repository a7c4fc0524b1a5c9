//! Domain model for boards, columns, and cards.
//!
//! The domain owns the card state machine and the block-metadata contract
//! while keeping all infrastructure concerns outside of the domain boundary.

mod board;
mod card;
mod column;
mod error;
mod ids;
mod search;

pub use board::Board;
pub use card::{
    BlockMetadata, BlockedState, Card, CardFields, CardMove, CardPatch, ExternalLink,
    PersistedCardData,
};
pub use column::{BLOCKED_COLUMN, Column, ColumnName, DEFAULT_COLUMNS, WipLimit};
pub use error::{BoardDomainError, ParseSearchFieldError};
pub use ids::{BoardId, BoardKey, CardId, ColumnId, DEFAULT_BOARD_KEY, UserKey};
pub use search::{DEFAULT_SEARCH_LIMIT, SearchField, SearchQuery};

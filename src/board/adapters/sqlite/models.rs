//! Diesel row models for board persistence.

use super::schema::{board_columns, boards, cards};
use diesel::prelude::*;

/// Row model for board records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BoardRow {
    /// Board identifier.
    pub id: String,
    /// Unique board key.
    pub board_key: String,
    /// Caller that first touched the board.
    pub created_by: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Row model for column records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ColumnRow {
    /// Column identifier.
    pub id: String,
    /// Owning board.
    pub board_id: String,
    /// Column name.
    pub name: String,
    /// 0-based ordering position.
    pub position: i32,
    /// Informational WIP limit.
    pub wip_limit: Option<i32>,
}

/// Query result row for card records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardRow {
    /// Card identifier.
    pub id: String,
    /// Owning board.
    pub board_id: String,
    /// Current column name.
    pub column_name: String,
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Card assignee.
    pub assignee: String,
    /// Priority label.
    pub priority: String,
    /// External link type.
    pub external_type: Option<String>,
    /// External link identifier.
    pub external_id: Option<String>,
    /// Responsible party while blocked.
    pub blocked_by: Option<String>,
    /// Reason while blocked.
    pub blocked_reason: Option<String>,
    /// Start of the block episode.
    pub blocked_since: Option<String>,
    /// Caller that last moved the card.
    pub last_moved_by: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Latest change timestamp.
    pub updated_at: String,
}

/// Insert model for card records. `seq` is assigned by `SQLite`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub struct NewCardRow {
    /// Card identifier.
    pub id: String,
    /// Owning board.
    pub board_id: String,
    /// Current column name.
    pub column_name: String,
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Card assignee.
    pub assignee: String,
    /// Priority label.
    pub priority: String,
    /// External link type.
    pub external_type: Option<String>,
    /// External link identifier.
    pub external_id: Option<String>,
    /// Responsible party while blocked.
    pub blocked_by: Option<String>,
    /// Reason while blocked.
    pub blocked_reason: Option<String>,
    /// Start of the block episode.
    pub blocked_since: Option<String>,
    /// Caller that last moved the card.
    pub last_moved_by: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Latest change timestamp.
    pub updated_at: String,
}

/// Full-state changeset for a card update.
///
/// `None` writes `NULL`, so leaving `blocked` clears all three block
/// columns in the same statement that changes `column_name`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cards)]
#[diesel(treat_none_as_null = true)]
pub struct CardChangeset {
    /// Current column name.
    pub column_name: String,
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Card assignee.
    pub assignee: String,
    /// Priority label.
    pub priority: String,
    /// Responsible party while blocked.
    pub blocked_by: Option<String>,
    /// Reason while blocked.
    pub blocked_reason: Option<String>,
    /// Start of the block episode.
    pub blocked_since: Option<String>,
    /// Caller that last moved the card.
    pub last_moved_by: Option<String>,
    /// Latest change timestamp.
    pub updated_at: String,
}

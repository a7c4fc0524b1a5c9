//! Diesel schema for board persistence.

diesel::table! {
    /// Boards addressed by key.
    boards (id) {
        /// Board identifier.
        id -> Text,
        /// Unique board key.
        board_key -> Text,
        /// Caller that first touched the board.
        created_by -> Text,
        /// RFC 3339 creation timestamp.
        created_at -> Text,
    }
}

diesel::table! {
    /// Ordered columns belonging to a board.
    board_columns (id) {
        /// Column identifier.
        id -> Text,
        /// Owning board.
        board_id -> Text,
        /// Column name, unique per board.
        name -> Text,
        /// 0-based ordering position.
        position -> Integer,
        /// Informational WIP limit.
        wip_limit -> Nullable<Integer>,
    }
}

diesel::table! {
    /// Cards in insertion order.
    cards (seq) {
        /// Insertion sequence.
        seq -> BigInt,
        /// Card identifier.
        id -> Text,
        /// Owning board.
        board_id -> Text,
        /// Current column name.
        column_name -> Text,
        /// Card title.
        title -> Text,
        /// Card description.
        description -> Text,
        /// Card assignee.
        assignee -> Text,
        /// Priority label.
        priority -> Text,
        /// External link type.
        external_type -> Nullable<Text>,
        /// External link identifier.
        external_id -> Nullable<Text>,
        /// Responsible party while blocked.
        blocked_by -> Nullable<Text>,
        /// Reason while blocked.
        blocked_reason -> Nullable<Text>,
        /// RFC 3339 start of the block episode.
        blocked_since -> Nullable<Text>,
        /// Caller that last moved the card.
        last_moved_by -> Nullable<Text>,
        /// RFC 3339 creation timestamp.
        created_at -> Text,
        /// RFC 3339 latest change timestamp.
        updated_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(boards, board_columns, cards);

/// Idempotent DDL applied when a store is opened.
pub const SCHEMA_SQL: &str = r"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS boards (
    id TEXT PRIMARY KEY NOT NULL,
    board_key TEXT NOT NULL UNIQUE,
    created_by TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS board_columns (
    id TEXT PRIMARY KEY NOT NULL,
    board_id TEXT NOT NULL REFERENCES boards (id),
    name TEXT NOT NULL,
    position INTEGER NOT NULL,
    wip_limit INTEGER,
    UNIQUE (board_id, name)
);

CREATE TABLE IF NOT EXISTS cards (
    seq INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    id TEXT NOT NULL UNIQUE,
    board_id TEXT NOT NULL REFERENCES boards (id),
    column_name TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    assignee TEXT NOT NULL DEFAULT '',
    priority TEXT NOT NULL DEFAULT '',
    external_type TEXT,
    external_id TEXT,
    blocked_by TEXT,
    blocked_reason TEXT,
    blocked_since TEXT,
    last_moved_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_cards_external_link
    ON cards (board_id, external_type, external_id)
    WHERE external_type IS NOT NULL AND external_id IS NOT NULL;

CREATE INDEX IF NOT EXISTS idx_cards_board_column ON cards (board_id, column_name, seq);
";

//! Tool catalogue and strongly-typed tool arguments.
//!
//! Every argument struct rejects unknown fields so a misspelt parameter
//! fails loudly instead of being silently dropped.

use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Tools served by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// Ensure the board exists and report where it lives.
    KanbanHandshake,
    /// Columns with WIP limits and card counts.
    BoardInfo,
    /// Append a column.
    AddColumn,
    /// Create a card.
    AddCard,
    /// Patch a card's text fields.
    UpdateCard,
    /// Move a card between columns.
    MoveCard,
    /// List cards.
    ListCards,
    /// Search cards by text.
    SearchCards,
    /// Import story files.
    SyncFromStory,
}

impl ToolName {
    /// Every tool in catalogue order.
    pub const ALL: [Self; 9] = [
        Self::KanbanHandshake,
        Self::BoardInfo,
        Self::AddColumn,
        Self::AddCard,
        Self::UpdateCard,
        Self::MoveCard,
        Self::ListCards,
        Self::SearchCards,
        Self::SyncFromStory,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KanbanHandshake => "kanban_handshake",
            Self::BoardInfo => "board_info",
            Self::AddColumn => "add_column",
            Self::AddCard => "add_card",
            Self::UpdateCard => "update_card",
            Self::MoveCard => "move_card",
            Self::ListCards => "list_cards",
            Self::SearchCards => "search_cards",
            Self::SyncFromStory => "sync_from_story",
        }
    }

    /// Resolves a wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name.trim())
    }

    const fn description(self) -> &'static str {
        match self {
            Self::KanbanHandshake => "Ensure the board exists and report its store and identifiers",
            Self::BoardInfo => "List columns with WIP limits and card counts",
            Self::AddColumn => "Append a column to the board",
            Self::AddCard => {
                "Create a card; creating directly in 'blocked' requires blocked_by and blocked_reason"
            }
            Self::UpdateCard => "Update a card's title, description, assignee or priority",
            Self::MoveCard => {
                "Move a card to a column; moving to 'blocked' requires blocked_by and blocked_reason"
            }
            Self::ListCards => "List cards in insertion order, optionally for one column",
            Self::SearchCards => "Case-insensitive substring search over card fields",
            Self::SyncFromStory => "Mirror story_state.json onto the board when enabled",
        }
    }

    fn input_schema(self) -> Value {
        let string = json!({ "type": "string" });
        let integer = json!({ "type": "integer", "minimum": 1 });
        let (extra, required): (Vec<(&str, Value)>, Vec<&str>) = match self {
            Self::KanbanHandshake | Self::BoardInfo | Self::SyncFromStory => (vec![], vec![]),
            Self::AddColumn => (
                vec![("name", string.clone()), ("wip_limit", integer)],
                vec!["name"],
            ),
            Self::AddCard => (
                vec![
                    ("title", string.clone()),
                    ("column", string.clone()),
                    ("description", string.clone()),
                    ("assignee", string.clone()),
                    ("priority", string.clone()),
                    ("external_type", string.clone()),
                    ("external_id", string.clone()),
                    ("blocked_by", string.clone()),
                    ("blocked_reason", string.clone()),
                ],
                vec!["title", "column"],
            ),
            Self::UpdateCard => (
                vec![
                    ("card_id", string.clone()),
                    (
                        "fields",
                        json!({
                            "type": "object",
                            "properties": {
                                "title": string,
                                "description": string,
                                "assignee": string,
                                "priority": string,
                            },
                            "additionalProperties": false,
                        }),
                    ),
                ],
                vec!["card_id", "fields"],
            ),
            Self::MoveCard => (
                vec![
                    ("card_id", string.clone()),
                    ("target_column", string.clone()),
                    ("blocked_by", string.clone()),
                    ("blocked_reason", string.clone()),
                ],
                vec!["user_key", "card_id", "target_column"],
            ),
            Self::ListCards => (vec![("column", string.clone())], vec![]),
            Self::SearchCards => (
                vec![
                    ("query", string.clone()),
                    (
                        "fields",
                        json!({
                            "type": "array",
                            "items": { "enum": ["title", "description", "external_id"] },
                        }),
                    ),
                    ("limit", integer),
                ],
                vec!["query"],
            ),
        };

        let mut properties = Map::new();
        properties.insert("user_key".to_owned(), string.clone());
        properties.insert("board_key".to_owned(), string);
        for (name, schema) in extra {
            properties.insert(name.to_owned(), schema);
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

/// Returns the `tools/list` catalogue.
#[must_use]
pub fn tool_definitions() -> Vec<Value> {
    ToolName::ALL
        .into_iter()
        .map(|tool| {
            json!({
                "name": tool.as_str(),
                "description": tool.description(),
                "inputSchema": tool.input_schema(),
            })
        })
        .collect()
}

/// Caller identity and board selection shared by every tool.
pub trait Scoped {
    /// Returns the raw `user_key` argument.
    fn user_key(&self) -> Option<&str>;
    /// Returns the raw `board_key` argument.
    fn board_key(&self) -> Option<&str>;
}

macro_rules! scoped {
    ($($args:ty),+ $(,)?) => {
        $(impl Scoped for $args {
            fn user_key(&self) -> Option<&str> {
                self.user_key.as_deref()
            }

            fn board_key(&self) -> Option<&str> {
                self.board_key.as_deref()
            }
        })+
    };
}

/// Arguments of tools that take only the board scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeArgs {
    /// Caller identity.
    pub user_key: Option<String>,
    /// Board selector.
    pub board_key: Option<String>,
}

/// `add_column` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddColumnArgs {
    /// Caller identity.
    pub user_key: Option<String>,
    /// Board selector.
    pub board_key: Option<String>,
    /// Column name.
    pub name: String,
    /// Informational WIP limit.
    pub wip_limit: Option<i64>,
}

/// `add_card` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddCardArgs {
    /// Caller identity.
    pub user_key: Option<String>,
    /// Board selector.
    pub board_key: Option<String>,
    /// Card title.
    pub title: String,
    /// Initial column.
    pub column: String,
    /// Card description.
    pub description: Option<String>,
    /// Card assignee.
    pub assignee: Option<String>,
    /// Priority label.
    pub priority: Option<String>,
    /// External link type.
    pub external_type: Option<String>,
    /// External link identifier.
    pub external_id: Option<String>,
    /// Responsible party when created in `blocked`.
    pub blocked_by: Option<String>,
    /// Reason when created in `blocked`.
    pub blocked_reason: Option<String>,
}

/// Field patch accepted by `update_card`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardFieldsArgs {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement assignee.
    pub assignee: Option<String>,
    /// Replacement priority label.
    pub priority: Option<String>,
}

/// `update_card` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCardArgs {
    /// Caller identity.
    pub user_key: Option<String>,
    /// Board selector.
    pub board_key: Option<String>,
    /// Card identifier.
    pub card_id: String,
    /// Fields to change.
    pub fields: CardFieldsArgs,
}

/// `move_card` arguments. `user_key` is mandatory for moves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveCardArgs {
    /// Caller identity recorded as `last_moved_by`.
    pub user_key: String,
    /// Board selector.
    pub board_key: Option<String>,
    /// Card identifier.
    pub card_id: String,
    /// Destination column.
    pub target_column: String,
    /// Responsible party when entering `blocked`.
    pub blocked_by: Option<String>,
    /// Reason when entering `blocked`.
    pub blocked_reason: Option<String>,
}

impl Scoped for MoveCardArgs {
    fn user_key(&self) -> Option<&str> {
        Some(&self.user_key)
    }

    fn board_key(&self) -> Option<&str> {
        self.board_key.as_deref()
    }
}

/// `list_cards` arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListCardsArgs {
    /// Caller identity.
    pub user_key: Option<String>,
    /// Board selector.
    pub board_key: Option<String>,
    /// Column filter.
    pub column: Option<String>,
}

/// `search_cards` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchCardsArgs {
    /// Caller identity.
    pub user_key: Option<String>,
    /// Board selector.
    pub board_key: Option<String>,
    /// Text to look for.
    pub query: String,
    /// Fields to search.
    pub fields: Option<Vec<String>>,
    /// Result cap.
    pub limit: Option<i64>,
}

scoped!(
    ScopeArgs,
    AddColumnArgs,
    AddCardArgs,
    UpdateCardArgs,
    ListCardsArgs,
    SearchCardsArgs,
);

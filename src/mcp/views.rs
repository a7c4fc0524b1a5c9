//! Flat JSON renderings of board entities.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::board::{
    domain::Card,
    services::{BoardInfo, MovedCard},
};

/// Card row as returned by card tools.
#[derive(Debug, Serialize)]
pub struct CardView<'a> {
    id: String,
    board_id: String,
    column: &'a str,
    title: &'a str,
    description: &'a str,
    assignee: &'a str,
    priority: &'a str,
    external_type: Option<&'a str>,
    external_id: Option<&'a str>,
    blocked_by: Option<&'a str>,
    blocked_reason: Option<&'a str>,
    blocked_since: Option<DateTime<Utc>>,
    last_moved_by: Option<&'a str>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Card> for CardView<'a> {
    fn from(card: &'a Card) -> Self {
        let fields = card.fields();
        let link = card.external_link();
        let blocked = card.blocked();
        Self {
            id: card.id().to_string(),
            board_id: card.board_id().to_string(),
            column: card.column().as_str(),
            title: fields.title(),
            description: fields.description(),
            assignee: fields.assignee(),
            priority: fields.priority(),
            external_type: link.map(|value| value.external_type()),
            external_id: link.map(|value| value.external_id()),
            blocked_by: blocked.map(|state| state.blocked_by()),
            blocked_reason: blocked.map(|state| state.reason()),
            blocked_since: blocked.map(|state| state.since()),
            last_moved_by: card.last_moved_by().map(|user| user.as_str()),
            created_at: card.created_at(),
            updated_at: card.updated_at(),
        }
    }
}

/// Renders a list of cards.
#[must_use]
pub fn card_list(cards: &[Card]) -> Vec<CardView<'_>> {
    cards.iter().map(CardView::from).collect()
}

/// `move_card` result: the updated card plus both columns.
#[derive(Debug, Serialize)]
pub struct MoveView<'a> {
    card: CardView<'a>,
    from: &'a str,
    to: &'a str,
}

impl<'a> From<&'a MovedCard> for MoveView<'a> {
    fn from(moved: &'a MovedCard) -> Self {
        Self {
            card: CardView::from(&moved.card),
            from: moved.from.as_str(),
            to: moved.card.column().as_str(),
        }
    }
}

/// One column of a `board_info` result.
#[derive(Debug, Serialize)]
pub struct ColumnView<'a> {
    column: &'a str,
    position: u32,
    wip_limit: Option<u32>,
    count: usize,
}

/// `board_info` result.
#[derive(Debug, Serialize)]
pub struct BoardInfoView<'a> {
    board_id: String,
    board_key: &'a str,
    columns: Vec<ColumnView<'a>>,
}

impl<'a> From<&'a BoardInfo> for BoardInfoView<'a> {
    fn from(info: &'a BoardInfo) -> Self {
        Self {
            board_id: info.board.id().to_string(),
            board_key: info.board.key().as_str(),
            columns: info
                .columns
                .iter()
                .map(|summary| ColumnView {
                    column: summary.column.name().as_str(),
                    position: summary.column.position(),
                    wip_limit: summary.column.wip_limit().map(|limit| limit.value()),
                    count: summary.card_count,
                })
                .collect(),
        }
    }
}

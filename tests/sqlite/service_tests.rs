//! Board services running over a file-backed store.

use std::sync::Arc;

use crate::sqlite::helpers::{TempStore, store};
use modulor::board::{
    adapters::sqlite::SqliteBoardRepository,
    domain::{BoardKey, UserKey},
    services::{
        AddCardRequest, AddColumnRequest, BoardService, CardLifecycleService, CardQueryService,
        ErrorKind, MoveCardRequest, SearchCardsRequest,
    },
};
use mockable::DefaultClock;
use rstest::rstest;

struct Services {
    boards: BoardService<SqliteBoardRepository, DefaultClock>,
    cards: CardLifecycleService<SqliteBoardRepository, DefaultClock>,
    queries: CardQueryService<SqliteBoardRepository, DefaultClock>,
}

fn services(repo: SqliteBoardRepository) -> Services {
    let repository = Arc::new(repo);
    let clock = Arc::new(DefaultClock);
    Services {
        boards: BoardService::new(Arc::clone(&repository), Arc::clone(&clock)),
        cards: CardLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock)),
        queries: CardQueryService::new(repository, clock),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ensure_board_is_idempotent_across_reopen(store: TempStore) {
    let key = BoardKey::new("team-a").expect("valid key");
    let first = services(store.open())
        .boards
        .ensure_board(&key, &UserKey::new("u1"))
        .await
        .expect("create board");

    let again = services(store.open());
    let second = again
        .boards
        .ensure_board(&key, &UserKey::new("u2"))
        .await
        .expect("find board");
    let columns = again.boards.list_columns(&second).await.expect("columns");

    assert_eq!(first.id(), second.id());
    assert_eq!(second.created_by().as_str(), "u1");
    assert_eq!(columns.len(), 6);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blocked_workflow_persists(store: TempStore) {
    let svc = services(store.open());
    let board = svc
        .boards
        .ensure_board(&BoardKey::default_key(), &UserKey::new("u1"))
        .await
        .expect("board");
    let card = svc
        .cards
        .add_card(&board, AddCardRequest::new("in_progress", "Fix bug"))
        .await
        .expect("add card");

    let rejected = svc
        .cards
        .move_card(
            &board,
            MoveCardRequest::new(card.id(), "blocked", UserKey::new("alice")),
        )
        .await
        .expect_err("block without metadata");
    assert_eq!(rejected.kind(), ErrorKind::MissingBlockMetadata);

    svc.cards
        .move_card(
            &board,
            MoveCardRequest::new(card.id(), "blocked", UserKey::new("alice"))
                .with_block(Some("security-team".into()), Some("pending review".into())),
        )
        .await
        .expect("block with metadata");

    let reloaded = services(store.open())
        .cards
        .find_card(&board, card.id())
        .await
        .expect("card persisted");
    let state = reloaded.blocked().expect("block persisted");
    assert_eq!(reloaded.column().as_str(), "blocked");
    assert_eq!(state.blocked_by(), "security-team");
    assert_eq!(state.reason(), "pending review");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn custom_column_accepts_cards_and_counts(store: TempStore) {
    let svc = services(store.open());
    let board = svc
        .boards
        .ensure_board(&BoardKey::default_key(), &UserKey::new("u1"))
        .await
        .expect("board");
    let qa = svc
        .boards
        .add_column(&board, AddColumnRequest::new("qa").with_wip_limit(2))
        .await
        .expect("add column");
    svc.cards
        .add_card(&board, AddCardRequest::new("qa", "Verify login"))
        .await
        .expect("add card");

    let info = svc.queries.board_info(&board).await.expect("board info");
    let qa_summary = info
        .columns
        .iter()
        .find(|summary| summary.column.name().as_str() == "qa")
        .expect("qa summary");

    assert_eq!(qa.position(), 6);
    assert_eq!(qa_summary.card_count, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_finds_cards_by_external_id(store: TempStore) {
    let svc = services(store.open());
    let board = svc
        .boards
        .ensure_board(&BoardKey::default_key(), &UserKey::new("u1"))
        .await
        .expect("board");
    svc.cards
        .add_card(
            &board,
            AddCardRequest::new("backlog", "Story 12").with_external_link("story", "ST-12"),
        )
        .await
        .expect("linked card");
    svc.cards
        .add_card(&board, AddCardRequest::new("backlog", "Unrelated"))
        .await
        .expect("plain card");

    let hits = svc
        .queries
        .search_cards(
            &board,
            SearchCardsRequest::new("st-12").with_fields(["external_id"]),
        )
        .await
        .expect("search");

    let titles: Vec<&str> = hits.iter().map(|c| c.fields().title()).collect();
    assert_eq!(titles, ["Story 12"]);
}

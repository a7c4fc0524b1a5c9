//! Boards keyed separately never see each other's columns or cards.

use std::sync::Arc;

use crate::in_memory::helpers::repo;
use modulor::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{BoardKey, UserKey},
    services::{
        AddCardRequest, AddColumnRequest, BoardService, CardLifecycleService, CardQueryService,
        ErrorKind,
    },
};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn columns_and_cards_stay_on_their_board(repo: Arc<InMemoryBoardRepository>) {
    let clock = Arc::new(DefaultClock);
    let boards = BoardService::new(Arc::clone(&repo), Arc::clone(&clock));
    let cards = CardLifecycleService::new(Arc::clone(&repo), Arc::clone(&clock));
    let queries = CardQueryService::new(repo, clock);
    let user = UserKey::new("u1");
    let team_a = boards
        .ensure_board(&BoardKey::new("team-a").expect("key"), &user)
        .await
        .expect("board a");
    let team_b = boards
        .ensure_board(&BoardKey::new("team-b").expect("key"), &user)
        .await
        .expect("board b");

    boards
        .add_column(&team_a, AddColumnRequest::new("qa"))
        .await
        .expect("qa on team a");
    cards
        .add_card(&team_a, AddCardRequest::new("qa", "Only on A"))
        .await
        .expect("card on team a");
    let missing_column = cards
        .add_card(&team_b, AddCardRequest::new("qa", "Not on B"))
        .await
        .expect_err("qa does not exist on team b");

    assert_ne!(team_a.id(), team_b.id());
    assert_eq!(missing_column.kind(), ErrorKind::UnknownColumn);
    assert_eq!(queries.list_cards(&team_a, None).await.expect("list").len(), 1);
    assert!(queries.list_cards(&team_b, None).await.expect("list").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_external_link_allowed_on_different_boards(repo: Arc<InMemoryBoardRepository>) {
    let clock = Arc::new(DefaultClock);
    let boards = BoardService::new(Arc::clone(&repo), Arc::clone(&clock));
    let cards = CardLifecycleService::new(repo, clock);
    let user = UserKey::anonymous();

    for key in ["team-a", "team-b"] {
        let board = boards
            .ensure_board(&BoardKey::new(key).expect("key"), &user)
            .await
            .expect("board");
        cards
            .add_card(
                &board,
                AddCardRequest::new("backlog", "Linked").with_external_link("story", "S-1"),
            )
            .await
            .expect("link is unique per board only");
    }
}

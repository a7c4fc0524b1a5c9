//! Port-level tests for [`SqliteBoardRepository`].

use crate::sqlite::helpers::{TempStore, store};
use modulor::board::adapters::sqlite::SqliteBoardRepository;
use modulor::board::{
    domain::{
        BlockMetadata, Board, BoardKey, Card, CardFields, Column, ColumnName, ExternalLink,
        UserKey, WipLimit,
    },
    ports::{BoardRepository, BoardRepositoryError},
};
use mockable::DefaultClock;
use rstest::rstest;

fn column(name: &str) -> ColumnName {
    ColumnName::new(name).expect("valid column name")
}

async fn seeded_board(repo: &impl BoardRepository) -> Board {
    let board = Board::new(BoardKey::default_key(), UserKey::new("u1"), &DefaultClock);
    repo.store_board(&board, &Column::defaults_for(board.id()))
        .await
        .expect("store board");
    board
}

fn card(board: &Board, title: &str, column_name: &str) -> Card {
    Card::new(
        board.id(),
        column(column_name),
        CardFields::new(title).expect("valid title"),
        None,
        None,
        &DefaultClock,
    )
    .expect("card creation")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_and_columns_survive_reopen(store: TempStore) {
    let board = seeded_board(&store.open()).await;

    let reopened = store.open();
    let found = reopened
        .find_board_by_key(board.key())
        .await
        .expect("lookup")
        .expect("board persisted");
    let columns = reopened.list_columns(found.id()).await.expect("columns");

    assert_eq!(found.id(), board.id());
    assert_eq!(found.created_by().as_str(), "u1");
    let names: Vec<&str> = columns.iter().map(|c| c.name().as_str()).collect();
    assert_eq!(
        names,
        [
            "backlog",
            "current_sprint",
            "in_progress",
            "blocked",
            "done",
            "archived",
        ]
    );
    let positions: Vec<u32> = columns.iter().map(Column::position).collect();
    assert_eq!(positions, [0, 1, 2, 3, 4, 5]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_board_key_rejected(store: TempStore) {
    let repo = store.open();
    seeded_board(&repo).await;
    let other = Board::new(BoardKey::default_key(), UserKey::new("u2"), &DefaultClock);

    let result = repo.store_board(&other, &[]).await;

    assert!(matches!(result, Err(BoardRepositoryError::DuplicateBoard(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_column_name_rejected(store: TempStore) {
    let repo = store.open();
    let board = seeded_board(&repo).await;
    let clash = Column::new(board.id(), column("archived"), 9, None);

    let result = repo.store_column(&clash).await;

    assert!(matches!(
        result,
        Err(BoardRepositoryError::DuplicateColumn { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wip_limit_round_trips(store: TempStore) {
    let repo = store.open();
    let board = seeded_board(&repo).await;
    let limit = WipLimit::new(3).expect("valid limit");
    repo.store_column(&Column::new(board.id(), column("qa"), 6, Some(limit)))
        .await
        .expect("store column");

    let columns = repo.list_columns(board.id()).await.expect("columns");
    let qa = columns
        .iter()
        .find(|c| c.name().as_str() == "qa")
        .expect("qa column");

    assert_eq!(qa.wip_limit().map(WipLimit::value), Some(3));
    assert_eq!(qa.position(), 6);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unblocked_card_round_trips_with_empty_block_state(store: TempStore) {
    let repo = store.open();
    let board = seeded_board(&repo).await;
    let stored = card(&board, "Fix bug", "backlog");
    repo.store_card(&stored).await.expect("store card");

    let found = repo
        .find_card(board.id(), stored.id())
        .await
        .expect("lookup")
        .expect("card persisted");

    assert_eq!(found.fields().title(), "Fix bug");
    assert_eq!(found.column().as_str(), "backlog");
    assert!(found.blocked().is_none());
    assert!(found.last_moved_by().is_none());
    assert!(found.external_link().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn block_then_unblock_persists_and_clears(store: TempStore) {
    let repo = store.open();
    let board = seeded_board(&repo).await;
    let mut stored = card(&board, "Fix bug", "in_progress");
    repo.store_card(&stored).await.expect("store card");

    let block = BlockMetadata::from_optional(Some("ops"), Some("outage"));
    stored
        .move_to(column("blocked"), block, UserKey::new("alice"), &DefaultClock)
        .expect("block");
    repo.update_card(&stored).await.expect("persist block");
    let blocked = repo
        .find_card(board.id(), stored.id())
        .await
        .expect("lookup")
        .expect("card");
    let state = blocked.blocked().expect("block state persisted");
    assert_eq!(state.blocked_by(), "ops");
    assert_eq!(state.reason(), "outage");
    assert_eq!(
        blocked.last_moved_by().map(UserKey::as_str),
        Some("alice")
    );

    stored
        .move_to(column("done"), None, UserKey::new("bob"), &DefaultClock)
        .expect("unblock");
    repo.update_card(&stored).await.expect("persist unblock");
    let done = repo
        .find_card(board.id(), stored.id())
        .await
        .expect("lookup")
        .expect("card");
    assert!(done.blocked().is_none());
    assert_eq!(done.column().as_str(), "done");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn block_refresh_keeps_original_since(store: TempStore) {
    let repo = store.open();
    let board = seeded_board(&repo).await;
    let mut stored = card(&board, "Fix bug", "in_progress");
    repo.store_card(&stored).await.expect("store card");
    stored
        .move_to(
            column("blocked"),
            BlockMetadata::from_optional(Some("ops"), Some("outage")),
            UserKey::new("alice"),
            &DefaultClock,
        )
        .expect("block");
    repo.update_card(&stored).await.expect("persist block");
    let first_since = repo
        .find_card(board.id(), stored.id())
        .await
        .expect("lookup")
        .and_then(|c| c.blocked().map(|state| state.since()))
        .expect("since recorded");

    stored
        .move_to(
            column("blocked"),
            BlockMetadata::from_optional(Some("vendor"), Some("patch")),
            UserKey::new("bob"),
            &DefaultClock,
        )
        .expect("refresh");
    repo.update_card(&stored).await.expect("persist refresh");
    let refreshed = repo
        .find_card(board.id(), stored.id())
        .await
        .expect("lookup")
        .expect("card");
    let state = refreshed.blocked().expect("still blocked");

    assert_eq!(state.since(), first_since);
    assert_eq!(state.blocked_by(), "vendor");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn external_link_is_unique_per_board(store: TempStore) {
    let repo = store.open();
    let board = seeded_board(&repo).await;
    let link = ExternalLink::new("story", "S-1").expect("valid link");
    let first = Card::new(
        board.id(),
        column("backlog"),
        CardFields::new("Story S-1").expect("title"),
        Some(link.clone()),
        None,
        &DefaultClock,
    )
    .expect("card");
    let second = Card::new(
        board.id(),
        column("current_sprint"),
        CardFields::new("Copy").expect("title"),
        Some(link.clone()),
        None,
        &DefaultClock,
    )
    .expect("card");
    repo.store_card(&first).await.expect("store first");

    let result = repo.store_card(&second).await;
    let found = repo
        .find_card_by_external_link(board.id(), &link)
        .await
        .expect("lookup")
        .expect("linked card");

    assert!(matches!(
        result,
        Err(BoardRepositoryError::DuplicateExternalLink { .. })
    ));
    assert_eq!(found.id(), first.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cards_list_in_insertion_order(store: TempStore) {
    let repo = store.open();
    let board = seeded_board(&repo).await;
    for title in ["first", "second", "third"] {
        repo.store_card(&card(&board, title, "backlog"))
            .await
            .expect("store card");
    }
    repo.store_card(&card(&board, "elsewhere", "done"))
        .await
        .expect("store card");

    let backlog = repo
        .list_cards(board.id(), Some(column("backlog")))
        .await
        .expect("list");
    let all = repo.list_cards(board.id(), None).await.expect("list");

    let titles: Vec<&str> = backlog.iter().map(|c| c.fields().title()).collect();
    assert_eq!(titles, ["first", "second", "third"]);
    assert_eq!(all.len(), 4);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_unknown_card_reports_not_found(store: TempStore) {
    let repo = store.open();
    let board = seeded_board(&repo).await;
    let never_stored = card(&board, "ghost", "backlog");

    let result = repo.update_card(&never_stored).await;

    assert!(matches!(
        result,
        Err(BoardRepositoryError::CardNotFound(id)) if id == never_stored.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_creates_missing_parent_directories(store: TempStore) {
    let nested = store
        .path()
        .parent()
        .expect("store path has a parent")
        .join(".local_context/nested/kanban.db");

    let repo = SqliteBoardRepository::open(&nested).expect("open nested store");
    seeded_board(&repo).await;

    assert!(nested.as_std_path().is_file());
}

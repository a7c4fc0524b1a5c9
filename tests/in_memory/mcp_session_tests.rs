//! Tool calls through the public server surface.

use std::sync::Arc;

use crate::in_memory::helpers::{TestServer, repo, server_with_sync, story_dir};
use modulor::{board::adapters::memory::InMemoryBoardRepository, mcp::tools::ToolName};
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;

async fn call(server: &TestServer, tool: ToolName, arguments: Value) -> Value {
    server
        .call_tool(tool, arguments)
        .await
        .expect("tool call should succeed")
}

fn titles_in(cards: &Value) -> Vec<String> {
    cards
        .as_array()
        .expect("card array")
        .iter()
        .filter_map(|card| card.get("title").and_then(Value::as_str))
        .map(str::to_owned)
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn story_import_runs_through_the_tool(
    repo: Arc<InMemoryBoardRepository>,
    story_dir: TempDir,
) {
    std::fs::write(
        story_dir.path().join("story_state.json"),
        r#"{"7": {"phase": "developing"}, "8": {"phase": "done"}}"#,
    )
    .expect("write story state");
    std::fs::write(story_dir.path().join("story_links.json"), "{}").expect("write story links");
    let server = server_with_sync(repo, &story_dir);

    let first = call(&server, ToolName::SyncFromStory, json!({})).await;
    let second = call(&server, ToolName::SyncFromStory, json!({})).await;
    let in_progress = call(
        &server,
        ToolName::ListCards,
        json!({ "column": "in_progress" }),
    )
    .await;

    assert_eq!(
        first,
        json!({
            "status": "synced",
            "created": 2,
            "moved": 0,
            "unchanged": 0,
            "skipped": 0,
        })
    );
    assert_eq!(
        second,
        json!({
            "status": "synced",
            "created": 0,
            "moved": 0,
            "unchanged": 2,
            "skipped": 0,
        })
    );
    assert_eq!(titles_in(&in_progress), ["Story 7"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sync_without_story_files_reports_so(
    repo: Arc<InMemoryBoardRepository>,
    story_dir: TempDir,
) {
    let server = server_with_sync(repo, &story_dir);

    let outcome = call(&server, ToolName::SyncFromStory, json!({})).await;

    assert_eq!(outcome, json!({ "status": "no_story_files" }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_then_search_on_named_board(
    repo: Arc<InMemoryBoardRepository>,
    story_dir: TempDir,
) {
    let server = server_with_sync(repo, &story_dir);
    let scope = json!({ "board_key": "ops", "user_key": "u1" });
    let card = call(
        &server,
        ToolName::AddCard,
        json!({ "board_key": "ops", "title": "Rotate keys", "column": "backlog" }),
    )
    .await;
    let card_id = card.get("id").and_then(Value::as_str).expect("card id");

    let updated = call(
        &server,
        ToolName::UpdateCard,
        json!({
            "board_key": "ops",
            "card_id": card_id,
            "fields": {
                "assignee": "carol",
                "description": "Carol holds the vault token",
                "priority": "high",
            },
        }),
    )
    .await;
    let hits = call(
        &server,
        ToolName::SearchCards,
        json!({ "board_key": "ops", "query": "CAROL", "fields": ["description"] }),
    )
    .await;
    let default_board_hits =
        call(&server, ToolName::SearchCards, json!({ "query": "rotate" })).await;
    let handshake = call(&server, ToolName::KanbanHandshake, scope).await;

    assert_eq!(updated.get("priority"), Some(&json!("high")));
    assert_eq!(updated.get("assignee"), Some(&json!("carol")));
    assert_eq!(titles_in(&hits), ["Rotate keys"]);
    assert!(titles_in(&default_board_hits).is_empty());
    assert_eq!(handshake.get("board_key"), Some(&json!("ops")));
}

//! Request dispatch for the MCP server.

use std::sync::Arc;

use mockable::Clock;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{
    error::ToolError,
    protocol::{self, JsonRpcRequest},
    tools::{
        AddCardArgs, AddColumnArgs, ListCardsArgs, MoveCardArgs, ScopeArgs, Scoped,
        SearchCardsArgs, ToolName, UpdateCardArgs, tool_definitions,
    },
    views::{BoardInfoView, CardView, MoveView, card_list},
};
use crate::{
    board::{
        domain::{Board, BoardKey, CardId, CardPatch, UserKey},
        ports::BoardRepository,
        services::{
            AddCardRequest, AddColumnRequest, BoardService, CardLifecycleService,
            CardQueryService, MoveCardRequest, SearchCardsRequest,
        },
    },
    config::ServerConfig,
    story_sync::StorySync,
};

/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "modulor";

type ToolResult = Result<Value, ToolError>;

/// MCP server bound to one board store.
///
/// Requests are handled one at a time; each `tools/call` resolves its board
/// and then runs exactly one board operation.
pub struct McpServer<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    boards: BoardService<R, C>,
    cards: CardLifecycleService<R, C>,
    queries: CardQueryService<R, C>,
    story_sync: StorySync,
    store_location: String,
}

impl<R, C> McpServer<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Wires the board services over `repository`.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, config: &ServerConfig) -> Self {
        Self {
            boards: BoardService::new(Arc::clone(&repository), Arc::clone(&clock)),
            cards: CardLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock)),
            queries: CardQueryService::new(repository, clock),
            story_sync: StorySync::new(config.sync_enabled, config.story_dir.clone()),
            store_location: config.db_path.to_string(),
        }
    }

    /// Handles one raw input line, returning the response to write, if any.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "discarding unparsable input");
                return Some(protocol::error(
                    None,
                    protocol::PARSE_ERROR,
                    &format!("Parse error: {err}"),
                ));
            }
        };
        let id = raw.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle(request).await,
            Err(err) => Some(protocol::error(
                id,
                protocol::INVALID_REQUEST,
                &format!("Invalid request: {err}"),
            )),
        }
    }

    /// Handles one decoded request. Notifications are still executed but
    /// never produce a response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<Value> {
        tracing::debug!(method = %request.method, "handling request");
        let expects_response = request.expects_response();
        let JsonRpcRequest {
            id, method, params, ..
        } = request;

        let response = match method.as_str() {
            "initialize" => {
                let protocol_version = params
                    .as_ref()
                    .and_then(|value| value.get("protocolVersion"))
                    .and_then(Value::as_str)
                    .unwrap_or(protocol::MCP_PROTOCOL_VERSION);
                Some(protocol::response(
                    id,
                    json!({
                        "protocolVersion": protocol_version,
                        "serverInfo": {
                            "name": SERVER_NAME,
                            "version": env!("CARGO_PKG_VERSION"),
                        },
                        "capabilities": { "tools": {} },
                    }),
                ))
            }
            "notifications/initialized" | "initialized" => None,
            "ping" => Some(protocol::response(id, json!({}))),
            "tools/list" => Some(protocol::response(
                id,
                json!({ "tools": tool_definitions() }),
            )),
            "tools/call" => Some(self.handle_tool_call(id, params).await),
            other => Some(protocol::error(
                id,
                protocol::METHOD_NOT_FOUND,
                &format!("Method not found: {other}"),
            )),
        };
        response.filter(|_| expects_response)
    }

    async fn handle_tool_call(&self, id: Option<Value>, params: Option<Value>) -> Value {
        let Some(Value::Object(mut params)) = params else {
            return protocol::error(id, protocol::INVALID_PARAMS, "params must be an object");
        };
        let Some(name) = params.get("name").and_then(Value::as_str).map(str::to_owned) else {
            return protocol::error(id, protocol::INVALID_PARAMS, "missing tool name");
        };
        let Some(tool) = ToolName::parse(&name) else {
            return protocol::error(
                id,
                protocol::INVALID_PARAMS,
                &format!("Unknown tool: {name}"),
            );
        };
        let arguments = match params.remove("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(value) => value,
        };

        let result = match self.call_tool(tool, arguments).await {
            Ok(payload) => protocol::tool_result(&payload, false),
            Err(err) => {
                tracing::warn!(
                    tool = tool.as_str(),
                    code = %err.kind(),
                    error = %err,
                    "tool call rejected"
                );
                protocol::tool_result(&err.to_payload(), true)
            }
        };
        protocol::response(id, result)
    }

    /// Runs one tool against the board selected by its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the arguments are malformed or the board
    /// operation fails.
    pub async fn call_tool(&self, tool: ToolName, arguments: Value) -> ToolResult {
        match tool {
            ToolName::KanbanHandshake => self.handshake(decode(arguments)?).await,
            ToolName::BoardInfo => self.board_info(decode(arguments)?).await,
            ToolName::AddColumn => self.add_column(decode(arguments)?).await,
            ToolName::AddCard => self.add_card(decode(arguments)?).await,
            ToolName::UpdateCard => self.update_card(decode(arguments)?).await,
            ToolName::MoveCard => self.move_card(decode(arguments)?).await,
            ToolName::ListCards => self.list_cards(decode(arguments)?).await,
            ToolName::SearchCards => self.search_cards(decode(arguments)?).await,
            ToolName::SyncFromStory => self.sync_from_story(decode(arguments)?).await,
        }
    }

    async fn scope(&self, args: &impl Scoped) -> Result<(Board, UserKey), ToolError> {
        let user_key = UserKey::new(args.user_key().unwrap_or_default());
        let board_key = match args.board_key().filter(|key| !key.trim().is_empty()) {
            Some(key) => BoardKey::new(key)?,
            None => BoardKey::default_key(),
        };
        let board = self.boards.ensure_board(&board_key, &user_key).await?;
        Ok((board, user_key))
    }

    async fn handshake(&self, args: ScopeArgs) -> ToolResult {
        let (board, user_key) = self.scope(&args).await?;
        Ok(json!({
            "db": self.store_location,
            "board_id": board.id().to_string(),
            "board_key": board.key().as_str(),
            "user_key": user_key.as_str(),
        }))
    }

    async fn board_info(&self, args: ScopeArgs) -> ToolResult {
        let (board, _) = self.scope(&args).await?;
        let info = self.queries.board_info(&board).await?;
        Ok(json!(BoardInfoView::from(&info)))
    }

    async fn add_column(&self, args: AddColumnArgs) -> ToolResult {
        let (board, _) = self.scope(&args).await?;
        let mut request = AddColumnRequest::new(args.name);
        if let Some(limit) = args.wip_limit {
            request = request.with_wip_limit(limit);
        }
        let column = self.boards.add_column(&board, request).await?;
        Ok(json!({
            "id": column.id().to_string(),
            "board_id": column.board_id().to_string(),
            "name": column.name().as_str(),
            "position": column.position(),
            "wip_limit": column.wip_limit().map(|limit| limit.value()),
        }))
    }

    async fn add_card(&self, args: AddCardArgs) -> ToolResult {
        let (board, _) = self.scope(&args).await?;
        let AddCardArgs {
            title,
            column,
            description,
            assignee,
            priority,
            external_type,
            external_id,
            blocked_by,
            blocked_reason,
            ..
        } = args;
        let mut request = AddCardRequest::new(column, title)
            .with_optional_link(external_type, external_id)
            .with_block(blocked_by, blocked_reason);
        if let Some(text) = description {
            request = request.with_description(text);
        }
        if let Some(name) = assignee {
            request = request.with_assignee(name);
        }
        if let Some(label) = priority {
            request = request.with_priority(label);
        }
        let card = self.cards.add_card(&board, request).await?;
        Ok(json!(CardView::from(&card)))
    }

    async fn update_card(&self, args: UpdateCardArgs) -> ToolResult {
        let (board, _) = self.scope(&args).await?;
        let card_id = CardId::parse(&args.card_id)?;
        let patch = CardPatch {
            title: args.fields.title,
            description: args.fields.description,
            assignee: args.fields.assignee,
            priority: args.fields.priority,
        };
        let card = self.cards.update_card(&board, card_id, patch).await?;
        Ok(json!(CardView::from(&card)))
    }

    async fn move_card(&self, args: MoveCardArgs) -> ToolResult {
        let (board, user_key) = self.scope(&args).await?;
        let card_id = CardId::parse(&args.card_id)?;
        let request = MoveCardRequest::new(card_id, args.target_column, user_key)
            .with_block(args.blocked_by, args.blocked_reason);
        let moved = self.cards.move_card(&board, request).await?;
        Ok(json!(MoveView::from(&moved)))
    }

    async fn list_cards(&self, args: ListCardsArgs) -> ToolResult {
        let (board, _) = self.scope(&args).await?;
        let cards = self
            .queries
            .list_cards(&board, args.column.as_deref())
            .await?;
        Ok(json!(card_list(&cards)))
    }

    async fn search_cards(&self, args: SearchCardsArgs) -> ToolResult {
        let (board, _) = self.scope(&args).await?;
        let mut request =
            SearchCardsRequest::new(args.query).with_fields(args.fields.unwrap_or_default());
        if let Some(limit) = args.limit {
            request = request.with_limit(limit);
        }
        let cards = self.queries.search_cards(&board, request).await?;
        Ok(json!(card_list(&cards)))
    }

    async fn sync_from_story(&self, args: ScopeArgs) -> ToolResult {
        let (board, user_key) = self.scope(&args).await?;
        let outcome = self.story_sync.run(&self.cards, &board, &user_key).await?;
        Ok(json!(outcome))
    }
}

fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    Ok(serde_json::from_value(arguments)?)
}

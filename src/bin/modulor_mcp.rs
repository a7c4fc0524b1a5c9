//! Serves the Modulor board over MCP on stdin/stdout.
//!
//! Configuration is read from the environment once at startup:
//!
//! ```text
//! KANBAN_DB_PATH      SQLite store (default .local_context/kanban.db or kanban.db)
//! KANBAN_SYNC_ENABLE  enable sync_from_story (1, true, yes, on)
//! KANBAN_STORY_DIR    story file directory (default .local_context)
//! RUST_LOG            log filter (default info)
//! ```
//!
//! Logs go to stderr; stdout carries only protocol frames.

use std::sync::Arc;

use mockable::DefaultClock;
use modulor::{
    board::adapters::sqlite::SqliteBoardRepository,
    config::ServerConfig,
    mcp::{McpServer, run_stdio},
};
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn configure_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = ServerConfig::from_env();
    configure_logging(&config.log_filter);
    tracing::info!(
        db_path = %config.db_path,
        sync_enabled = config.sync_enabled,
        story_dir = %config.story_dir,
        "starting modulor MCP server"
    );

    let repository = SqliteBoardRepository::open(&config.db_path)?;
    let server = McpServer::new(Arc::new(repository), Arc::new(DefaultClock), &config);
    run_stdio(&server).await?;
    Ok(())
}

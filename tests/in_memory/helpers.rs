//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use camino::Utf8PathBuf;
use modulor::{
    board::adapters::memory::InMemoryBoardRepository, config::ServerConfig, mcp::McpServer,
};
use mockable::DefaultClock;
use rstest::fixture;
use tempfile::TempDir;

/// Server type exercised by the in-memory tests.
pub type TestServer = McpServer<InMemoryBoardRepository, DefaultClock>;

/// Provides an empty shared repository.
#[fixture]
pub fn repo() -> Arc<InMemoryBoardRepository> {
    Arc::new(InMemoryBoardRepository::new())
}

/// Provides a temporary story directory.
#[fixture]
pub fn story_dir() -> TempDir {
    TempDir::new().expect("temporary directory")
}

/// Builds a server over `repo` with story import pointed at `story_dir`.
pub fn server_with_sync(repo: Arc<InMemoryBoardRepository>, story_dir: &TempDir) -> TestServer {
    let config = ServerConfig {
        db_path: Utf8PathBuf::from("memory"),
        sync_enabled: true,
        story_dir: Utf8PathBuf::from_path_buf(story_dir.path().to_path_buf())
            .expect("temporary directory path is UTF-8"),
        log_filter: "info".to_owned(),
    };
    McpServer::new(repo, Arc::new(DefaultClock), &config)
}

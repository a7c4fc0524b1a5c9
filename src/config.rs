//! Process configuration read once at startup.

use camino::{Utf8Path, Utf8PathBuf};

/// Directory holding the store and story files when present.
pub const LOCAL_CONTEXT_DIR: &str = ".local_context";

/// Store file name used when no path is configured.
pub const DEFAULT_DB_FILE: &str = "kanban.db";

/// Environment variable naming the `SQLite` store.
pub const DB_PATH_VAR: &str = "KANBAN_DB_PATH";

/// Environment variable enabling story import.
pub const SYNC_ENABLE_VAR: &str = "KANBAN_SYNC_ENABLE";

/// Environment variable naming the story directory.
pub const STORY_DIR_VAR: &str = "KANBAN_STORY_DIR";

/// Environment variable carrying the log filter.
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

/// Settings for the MCP server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `SQLite` store location.
    pub db_path: Utf8PathBuf,
    /// Whether `sync_from_story` may run.
    pub sync_enabled: bool,
    /// Directory holding `story_state.json` and `story_links.json`.
    pub story_dir: Utf8PathBuf,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl ServerConfig {
    /// Reads configuration from the process environment, resolving defaults
    /// against the current directory.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), Utf8Path::new("."))
    }

    /// Builds configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset. The default store lives under
    /// [`LOCAL_CONTEXT_DIR`] only when that directory exists in
    /// `working_dir`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F, working_dir: &Utf8Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_VAR).map_or_else(
            || default_db_path(working_dir),
            Utf8PathBuf::from,
        );
        let sync_enabled = read(SYNC_ENABLE_VAR).is_some_and(|value| is_truthy(&value));
        let story_dir = read(STORY_DIR_VAR).map_or_else(
            || working_dir.join(LOCAL_CONTEXT_DIR),
            Utf8PathBuf::from,
        );
        let log_filter = read(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Self {
            db_path,
            sync_enabled,
            story_dir,
            log_filter,
        }
    }
}

fn default_db_path(working_dir: &Utf8Path) -> Utf8PathBuf {
    let local_context = working_dir.join(LOCAL_CONTEXT_DIR);
    if local_context.is_dir() {
        local_context.join(DEFAULT_DB_FILE)
    } else {
        working_dir.join(DEFAULT_DB_FILE)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

//! Shared fixtures for `SQLite` integration tests.

use camino::Utf8PathBuf;
use modulor::board::adapters::sqlite::SqliteBoardRepository;
use rstest::fixture;
use tempfile::TempDir;

/// Temporary database file that is removed with its directory.
pub struct TempStore {
    dir: TempDir,
}

impl TempStore {
    /// Returns the database path inside the temporary directory.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join("kanban.db"))
            .expect("temporary directory path is UTF-8")
    }

    /// Opens (or reopens) the repository backed by this store.
    #[must_use]
    pub fn open(&self) -> SqliteBoardRepository {
        SqliteBoardRepository::open(&self.path()).expect("sqlite store should open")
    }
}

/// Provides a fresh temporary store.
#[fixture]
pub fn store() -> TempStore {
    TempStore {
        dir: TempDir::new().expect("temporary directory"),
    }
}

//! File-based story import.
//!
//! Reads `story_state.json` (story id to `{ "phase": ... }`) and requires a
//! companion `story_links.json` in the configured directory. Each story is
//! mirrored as a card linked by `("story", <id>)`: missing cards are
//! created, cards in the wrong column are moved, the rest are left alone.
//! Re-running an import over unchanged files changes nothing.

mod error;

pub use error::{StorySyncError, StorySyncResult};

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::board::{
    domain::{Board, ExternalLink, UserKey},
    ports::BoardRepository,
    services::{AddCardRequest, CardLifecycleService, MoveCardRequest},
};

/// Story phase file name.
pub const STORY_STATE_FILE: &str = "story_state.json";

/// Story link file name.
pub const STORY_LINKS_FILE: &str = "story_links.json";

/// External link type carried by imported cards.
pub const STORY_LINK_TYPE: &str = "story";

/// Maps a story phase onto the column its card belongs in.
#[must_use]
pub fn column_for_phase(phase: &str) -> &'static str {
    match phase {
        "developing" => "in_progress",
        "validating" => "current_sprint",
        "done" => "done",
        _ => "backlog",
    }
}

#[derive(Debug, Deserialize)]
struct StoryState {
    #[serde(default)]
    phase: String,
}

/// Counts reported by a completed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    /// Cards created for previously unseen stories.
    pub created: usize,
    /// Cards moved to match their story's phase.
    pub moved: usize,
    /// Cards already in the right column.
    pub unchanged: usize,
    /// Stories that could not be mirrored.
    pub skipped: usize,
}

/// Effect of mirroring one story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoryChange {
    Created,
    Moved,
    Unchanged,
}

/// Result of a sync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Import is switched off by configuration.
    Disabled,
    /// The story directory or one of its files is missing.
    NoStoryFiles,
    /// Import ran to completion.
    Synced(SyncCounts),
}

/// Story importer bound to one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorySync {
    enabled: bool,
    story_dir: Utf8PathBuf,
}

impl StorySync {
    /// Creates an importer for `story_dir`.
    #[must_use]
    pub fn new(enabled: bool, story_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            enabled,
            story_dir: story_dir.into(),
        }
    }

    /// Mirrors the story files onto `board`, attributing moves to
    /// `user_key`.
    ///
    /// Stories are processed in id order. A story whose card cannot be
    /// created or moved is logged and counted as skipped; the rest still run.
    ///
    /// # Errors
    ///
    /// Returns [`StorySyncError::Io`] when a file cannot be read and
    /// [`StorySyncError::Malformed`] for invalid JSON.
    pub async fn run<R, C>(
        &self,
        cards: &CardLifecycleService<R, C>,
        board: &Board,
        user_key: &UserKey,
    ) -> StorySyncResult<SyncOutcome>
    where
        R: BoardRepository,
        C: Clock + Send + Sync,
    {
        if !self.enabled {
            return Ok(SyncOutcome::Disabled);
        }
        let Some(stories) = self.load_stories()? else {
            tracing::info!(story_dir = %self.story_dir, "no story files found");
            return Ok(SyncOutcome::NoStoryFiles);
        };

        let mut counts = SyncCounts::default();
        for (story_id, state) in &stories {
            let column = column_for_phase(&state.phase);
            match sync_story(cards, board, user_key, story_id, column).await {
                Ok(StoryChange::Created) => counts.created += 1,
                Ok(StoryChange::Moved) => counts.moved += 1,
                Ok(StoryChange::Unchanged) => counts.unchanged += 1,
                Err(err) => {
                    tracing::warn!(
                        story_id = %story_id,
                        column,
                        error = %err,
                        "skipping story"
                    );
                    counts.skipped += 1;
                }
            }
        }
        tracing::info!(
            board_id = %board.id(),
            created = counts.created,
            moved = counts.moved,
            unchanged = counts.unchanged,
            skipped = counts.skipped,
            "story sync finished"
        );
        Ok(SyncOutcome::Synced(counts))
    }

    fn load_stories(&self) -> StorySyncResult<Option<BTreeMap<String, StoryState>>> {
        let dir = match Dir::open_ambient_dir(&self.story_dir, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorySyncError::io(&self.story_dir, err)),
        };
        let Some(state_text) = read_optional(&dir, &self.story_dir, STORY_STATE_FILE)? else {
            return Ok(None);
        };
        let Some(links_text) = read_optional(&dir, &self.story_dir, STORY_LINKS_FILE)? else {
            return Ok(None);
        };

        serde_json::from_str::<serde_json::Value>(&links_text)
            .map_err(|err| StorySyncError::malformed(STORY_LINKS_FILE, &err))?;
        let stories = serde_json::from_str(&state_text)
            .map_err(|err| StorySyncError::malformed(STORY_STATE_FILE, &err))?;
        Ok(Some(stories))
    }
}

async fn sync_story<R, C>(
    cards: &CardLifecycleService<R, C>,
    board: &Board,
    user_key: &UserKey,
    story_id: &str,
    column: &str,
) -> StorySyncResult<StoryChange>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    let link = ExternalLink::new(STORY_LINK_TYPE, story_id)?;
    match cards.find_by_external_link(board, &link).await? {
        None => {
            let request = AddCardRequest::new(column, format!("Story {story_id}"))
                .with_external_link(STORY_LINK_TYPE, story_id);
            cards.add_card(board, request).await?;
            Ok(StoryChange::Created)
        }
        Some(card) if card.column().as_str() != column => {
            let request = MoveCardRequest::new(card.id(), column, user_key.clone());
            cards.move_card(board, request).await?;
            Ok(StoryChange::Moved)
        }
        Some(_) => Ok(StoryChange::Unchanged),
    }
}

fn read_optional(dir: &Dir, dir_path: &Utf8Path, file: &str) -> StorySyncResult<Option<String>> {
    match dir.read_to_string(file) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorySyncError::io(&dir_path.join(file), err)),
    }
}

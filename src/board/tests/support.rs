//! Shared fixtures for board unit tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use crate::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{Board, BoardId, BoardKey, UserKey},
    services::{BoardService, CardLifecycleService, CardQueryService},
};

/// Clock that advances one second on every reading.
#[derive(Debug)]
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::starting_at(
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
                .single()
                .expect("valid start time"),
        )
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.now.lock().expect("clock lock");
        let reading = *now;
        *now = reading + Duration::seconds(1);
        reading
    }
}

pub type TestBoards = BoardService<InMemoryBoardRepository, SteppingClock>;
pub type TestCards = CardLifecycleService<InMemoryBoardRepository, SteppingClock>;
pub type TestQueries = CardQueryService<InMemoryBoardRepository, SteppingClock>;

/// Services wired to one shared in-memory repository.
pub struct Harness {
    pub boards: TestBoards,
    pub cards: TestCards,
    pub queries: TestQueries,
}

impl Harness {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryBoardRepository::new());
        let clock = Arc::new(SteppingClock::default());
        Self {
            boards: BoardService::new(Arc::clone(&repository), Arc::clone(&clock)),
            cards: CardLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock)),
            queries: CardQueryService::new(repository, clock),
        }
    }

    pub async fn default_board(&self) -> Board {
        self.boards
            .ensure_board(&BoardKey::default_key(), &UserKey::new("tester"))
            .await
            .expect("default board should be created")
    }
}

pub fn board_id() -> BoardId {
    BoardId::new()
}

//! Shared world state for blocked workflow BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use modulor::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{Board, Card},
    services::{BoardService, BoardServiceError, CardLifecycleService, MovedCard},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Board service type used by the BDD world.
pub type TestBoardService = BoardService<InMemoryBoardRepository, DefaultClock>;

/// Card service type used by the BDD world.
pub type TestCardService = CardLifecycleService<InMemoryBoardRepository, DefaultClock>;

/// Scenario world for blocked workflow behaviour tests.
pub struct BlockedWorkflowWorld {
    pub boards: TestBoardService,
    pub cards: TestCardService,
    pub board: Option<Board>,
    pub card: Option<Card>,
    pub blocked_since_before: Option<DateTime<Utc>>,
    pub last_move: Option<Result<MovedCard, BoardServiceError>>,
}

impl BlockedWorkflowWorld {
    /// Creates a world with an empty store.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryBoardRepository::new());
        let clock = Arc::new(DefaultClock);
        let boards = BoardService::new(Arc::clone(&repository), Arc::clone(&clock));
        let cards = CardLifecycleService::new(repository, clock);
        Self {
            boards,
            cards,
            board: None,
            card: None,
            blocked_since_before: None,
            last_move: None,
        }
    }

    /// Returns the board created by the scenario.
    pub fn board(&self) -> Result<&Board, eyre::Report> {
        self.board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing board in scenario world"))
    }

    /// Returns the card created by the scenario.
    pub fn card(&self) -> Result<&Card, eyre::Report> {
        self.card
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing card in scenario world"))
    }

    /// Reloads the scenario card from the store.
    pub fn stored_card(&self) -> Result<Card, eyre::Report> {
        let board = self.board()?;
        let card_id = self.card()?.id();
        Ok(run_async(self.cards.find_card(board, card_id))?)
    }
}

impl Default for BlockedWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BlockedWorkflowWorld {
    BlockedWorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

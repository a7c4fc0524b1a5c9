//! Application services for board orchestration.

mod board;
mod cards;
mod error;
mod query;

pub use board::{AddColumnRequest, BoardService};
pub use cards::{AddCardRequest, CardLifecycleService, MoveCardRequest, MovedCard};
pub use error::{BoardServiceError, BoardServiceResult, ErrorKind};
pub use query::{BoardInfo, CardQueryService, ColumnSummary, SearchCardsRequest};

//! `SQLite` repository implementation for board storage.

use super::{
    models::{BoardRow, CardChangeset, CardRow, ColumnRow, NewCardRow},
    schema::{SCHEMA_SQL, board_columns, boards, cards},
};
use crate::board::{
    domain::{
        BlockedState, Board, BoardId, BoardKey, Card, CardFields, CardId, Column, ColumnId,
        ColumnName, ExternalLink, PersistedCardData, UserKey, WipLimit,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use chrono::{DateTime, SecondsFormat, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use thiserror::Error;
use uuid::Uuid;

/// `SQLite` connection pool type used by board adapters.
pub type BoardSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Connection settings applied to every pooled connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute("PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Persisted row that violates a domain invariant.
#[derive(Debug, Error)]
#[error("corrupt card row {card_id}: {detail}")]
struct CorruptCardRow {
    card_id: String,
    detail: &'static str,
}

impl From<DieselError> for BoardRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `SQLite`-backed board repository.
#[derive(Debug, Clone)]
pub struct SqliteBoardRepository {
    pool: BoardSqlitePool,
}

impl SqliteBoardRepository {
    /// Creates a new repository from an existing pool.
    ///
    /// The schema must already exist; see [`SqliteBoardRepository::open`].
    #[must_use]
    pub const fn new(pool: BoardSqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the store at `path` and applies the schema.
    ///
    /// The pool holds a single connection so writes are serialized.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the parent
    /// directory, the database file, or the schema cannot be created.
    pub fn open(path: &Utf8Path) -> BoardRepositoryResult<Self> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_str().is_empty()) {
            Dir::create_ambient_dir_all(parent, ambient_authority())
                .map_err(BoardRepositoryError::persistence)?;
        }

        let manager = ConnectionManager::<SqliteConnection>::new(path.as_str());
        let pool = Pool::builder()
            .max_size(1)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)
            .map_err(BoardRepositoryError::persistence)?;

        {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            connection.batch_execute(SCHEMA_SQL)?;
        }

        tracing::debug!(path = %path, "opened sqlite board store");
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, operation: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }
}

#[async_trait]
impl BoardRepository for SqliteBoardRepository {
    async fn find_board_by_key(&self, key: &BoardKey) -> BoardRepositoryResult<Option<Board>> {
        let lookup_key = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = boards::table
                .filter(boards::board_key.eq(&lookup_key))
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()?;
            row.map(row_to_board).transpose()
        })
        .await
    }

    async fn store_board(&self, board: &Board, columns: &[Column]) -> BoardRepositoryResult<()> {
        let board_key = board.key().clone();
        let board_row = to_board_row(board);
        let column_rows: Vec<ColumnRow> = columns
            .iter()
            .map(to_column_row)
            .collect::<Result<_, _>>()?;

        self.run_blocking(move |connection| {
            connection.immediate_transaction::<_, BoardRepositoryError, _>(|transaction| {
                diesel::insert_into(boards::table)
                    .values(&board_row)
                    .execute(transaction)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            BoardRepositoryError::DuplicateBoard(board_key.clone())
                        }
                        _ => BoardRepositoryError::persistence(err),
                    })?;
                if !column_rows.is_empty() {
                    diesel::insert_into(board_columns::table)
                        .values(&column_rows)
                        .execute(transaction)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn list_columns(&self, board_id: BoardId) -> BoardRepositoryResult<Vec<Column>> {
        let lookup_board = board_id.to_string();
        self.run_blocking(move |connection| {
            board_columns::table
                .filter(board_columns::board_id.eq(&lookup_board))
                .order(board_columns::position.asc())
                .select(ColumnRow::as_select())
                .load::<ColumnRow>(connection)?
                .into_iter()
                .map(row_to_column)
                .collect()
        })
        .await
    }

    async fn store_column(&self, column: &Column) -> BoardRepositoryResult<()> {
        let board_id = column.board_id();
        let name = column.name().clone();
        let row = to_column_row(column)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(board_columns::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        BoardRepositoryError::DuplicateColumn {
                            board_id,
                            name: name.clone(),
                        }
                    }
                    _ => BoardRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn store_card(&self, card: &Card) -> BoardRepositoryResult<()> {
        let card_id = card.id();
        let link = card.external_link().cloned();
        let row = to_new_card_row(card);

        self.run_blocking(move |connection| {
            diesel::insert_into(cards::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match (err, link.as_ref()) {
                    (
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info),
                        Some(conflicting),
                    ) if is_external_link_violation(info.as_ref()) => {
                        BoardRepositoryError::duplicate_link(conflicting)
                    }
                    (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _), _) => {
                        BoardRepositoryError::DuplicateCard(card_id)
                    }
                    (other, _) => BoardRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_card(&self, card: &Card) -> BoardRepositoryResult<()> {
        let card_id = card.id();
        let board_id = card.board_id().to_string();
        let changeset = to_changeset(card);

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                cards::table
                    .filter(cards::id.eq(card_id.to_string()))
                    .filter(cards::board_id.eq(&board_id)),
            )
            .set(&changeset)
            .execute(connection)?;

            if updated == 0 {
                return Err(BoardRepositoryError::CardNotFound(card_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_card(
        &self,
        board_id: BoardId,
        card_id: CardId,
    ) -> BoardRepositoryResult<Option<Card>> {
        self.run_blocking(move |connection| {
            let row = cards::table
                .filter(cards::id.eq(card_id.to_string()))
                .filter(cards::board_id.eq(board_id.to_string()))
                .select(CardRow::as_select())
                .first::<CardRow>(connection)
                .optional()?;
            row.map(row_to_card).transpose()
        })
        .await
    }

    async fn find_card_by_external_link(
        &self,
        board_id: BoardId,
        link: &ExternalLink,
    ) -> BoardRepositoryResult<Option<Card>> {
        let external_type = link.external_type().to_owned();
        let external_id = link.external_id().to_owned();
        self.run_blocking(move |connection| {
            let row = cards::table
                .filter(cards::board_id.eq(board_id.to_string()))
                .filter(cards::external_type.eq(&external_type))
                .filter(cards::external_id.eq(&external_id))
                .select(CardRow::as_select())
                .first::<CardRow>(connection)
                .optional()?;
            row.map(row_to_card).transpose()
        })
        .await
    }

    async fn list_cards(
        &self,
        board_id: BoardId,
        column: Option<ColumnName>,
    ) -> BoardRepositoryResult<Vec<Card>> {
        self.run_blocking(move |connection| {
            let mut query = cards::table
                .filter(cards::board_id.eq(board_id.to_string()))
                .into_boxed();
            if let Some(name) = column {
                query = query.filter(cards::column_name.eq(name.as_str().to_owned()));
            }
            query
                .order(cards::seq.asc())
                .select(CardRow::as_select())
                .load::<CardRow>(connection)?
                .into_iter()
                .map(row_to_card)
                .collect()
        })
        .await
    }
}

fn is_external_link_violation(info: &dyn DatabaseErrorInformation) -> bool {
    // SQLite reports the violated columns in the message rather than a
    // constraint name.
    info.message().contains("external_id")
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(value: &str) -> BoardRepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(BoardRepositoryError::persistence)
}

fn parse_uuid(value: &str) -> BoardRepositoryResult<Uuid> {
    Uuid::parse_str(value).map_err(BoardRepositoryError::persistence)
}

fn to_board_row(board: &Board) -> BoardRow {
    BoardRow {
        id: board.id().to_string(),
        board_key: board.key().as_str().to_owned(),
        created_by: board.created_by().as_str().to_owned(),
        created_at: format_timestamp(board.created_at()),
    }
}

fn row_to_board(row: BoardRow) -> BoardRepositoryResult<Board> {
    Ok(Board::from_persisted(
        BoardId::from_uuid(parse_uuid(&row.id)?),
        BoardKey::new(row.board_key).map_err(BoardRepositoryError::persistence)?,
        UserKey::new(row.created_by),
        parse_timestamp(&row.created_at)?,
    ))
}

fn to_column_row(column: &Column) -> BoardRepositoryResult<ColumnRow> {
    let position = i32::try_from(column.position()).map_err(BoardRepositoryError::persistence)?;
    let wip_limit = column
        .wip_limit()
        .map(|limit| i32::try_from(limit.value()))
        .transpose()
        .map_err(BoardRepositoryError::persistence)?;

    Ok(ColumnRow {
        id: column.id().to_string(),
        board_id: column.board_id().to_string(),
        name: column.name().as_str().to_owned(),
        position,
        wip_limit,
    })
}

fn row_to_column(row: ColumnRow) -> BoardRepositoryResult<Column> {
    let ColumnRow {
        id,
        board_id,
        name,
        position,
        wip_limit,
    } = row;

    let wip = wip_limit
        .map(|limit| WipLimit::new(i64::from(limit)))
        .transpose()
        .map_err(BoardRepositoryError::persistence)?;

    Ok(Column::from_persisted(
        ColumnId::from_uuid(parse_uuid(&id)?),
        BoardId::from_uuid(parse_uuid(&board_id)?),
        ColumnName::new(name).map_err(BoardRepositoryError::persistence)?,
        u32::try_from(position).map_err(BoardRepositoryError::persistence)?,
        wip,
    ))
}

fn to_new_card_row(card: &Card) -> NewCardRow {
    let fields = card.fields();
    let blocked = card.blocked();
    NewCardRow {
        id: card.id().to_string(),
        board_id: card.board_id().to_string(),
        column_name: card.column().as_str().to_owned(),
        title: fields.title().to_owned(),
        description: fields.description().to_owned(),
        assignee: fields.assignee().to_owned(),
        priority: fields.priority().to_owned(),
        external_type: card
            .external_link()
            .map(|link| link.external_type().to_owned()),
        external_id: card.external_link().map(|link| link.external_id().to_owned()),
        blocked_by: blocked.map(|state| state.blocked_by().to_owned()),
        blocked_reason: blocked.map(|state| state.reason().to_owned()),
        blocked_since: blocked.map(|state| format_timestamp(state.since())),
        last_moved_by: card.last_moved_by().map(|user| user.as_str().to_owned()),
        created_at: format_timestamp(card.created_at()),
        updated_at: format_timestamp(card.updated_at()),
    }
}

fn to_changeset(card: &Card) -> CardChangeset {
    let fields = card.fields();
    let blocked = card.blocked();
    CardChangeset {
        column_name: card.column().as_str().to_owned(),
        title: fields.title().to_owned(),
        description: fields.description().to_owned(),
        assignee: fields.assignee().to_owned(),
        priority: fields.priority().to_owned(),
        blocked_by: blocked.map(|state| state.blocked_by().to_owned()),
        blocked_reason: blocked.map(|state| state.reason().to_owned()),
        blocked_since: blocked.map(|state| format_timestamp(state.since())),
        last_moved_by: card.last_moved_by().map(|user| user.as_str().to_owned()),
        updated_at: format_timestamp(card.updated_at()),
    }
}

fn row_to_card(row: CardRow) -> BoardRepositoryResult<Card> {
    let CardRow {
        id,
        board_id,
        column_name,
        title,
        description,
        assignee,
        priority,
        external_type,
        external_id,
        blocked_by,
        blocked_reason,
        blocked_since,
        last_moved_by,
        created_at,
        updated_at,
    } = row;

    let corrupt = |detail: &'static str| {
        BoardRepositoryError::persistence(CorruptCardRow {
            card_id: id.clone(),
            detail,
        })
    };

    let external_link = match (external_type, external_id) {
        (Some(kind), Some(link_id)) => Some(
            ExternalLink::new(kind, link_id).map_err(BoardRepositoryError::persistence)?,
        ),
        (None, None) => None,
        _ => return Err(corrupt("half of an external link is missing")),
    };

    let blocked = match (blocked_by, blocked_reason, blocked_since) {
        (Some(by), Some(reason), Some(since)) => Some(BlockedState::from_persisted(
            by,
            reason,
            parse_timestamp(&since)?,
        )),
        (None, None, None) => None,
        _ => return Err(corrupt("block columns are partially set")),
    };

    let column = ColumnName::new(column_name).map_err(BoardRepositoryError::persistence)?;
    if column.is_blocked() != blocked.is_some() {
        return Err(corrupt("block state does not match column"));
    }

    let fields = CardFields::new(title)
        .map_err(BoardRepositoryError::persistence)?
        .with_description(description)
        .with_assignee(assignee)
        .with_priority(priority);

    let data = PersistedCardData {
        id: CardId::from_uuid(parse_uuid(&id)?),
        board_id: BoardId::from_uuid(parse_uuid(&board_id)?),
        column,
        fields,
        external_link,
        blocked,
        last_moved_by: last_moved_by.map(UserKey::new),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    };
    Ok(Card::from_persisted(data))
}

//! PostgreSQL-backed `BoardRepository` implementation using Diesel ORM.
//!
//! Boards are one row each, with sections and completed tickets held in JSONB
//! arrays. Nested mutations are single `UPDATE` statements that rebuild the
//! array in place, so two concurrent appends to one board serialise on the
//! row lock and both land. Every mutation bumps `version` in the same
//! statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Jsonb, Text, Uuid as SqlUuid};
use diesel_async::AsyncPgConnection;
use diesel_async::RunQueryDsl;
use diesel_async::pooled_connection::bb8::PooledConnection;

use crate::domain::ports::{BoardRepository, BoardRepositoryError};
use crate::domain::{
    Board, BoardId, BoardName, BoardParts, Section, SectionTitle, Ticket, TicketId, Username,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BoardRow, BoardUpdate, NewBoardRow};
use super::pool::DbPool;
use super::schema::boards;

const APPEND_SECTION_SQL: &str = r#"
UPDATE boards
SET sections = sections || jsonb_build_array($2::jsonb),
    version = version + 1,
    updated_at = now()
WHERE id = $1
  AND NOT EXISTS (
    SELECT 1 FROM jsonb_array_elements(boards.sections) AS elements(section)
    WHERE section->>'title' = $3
  )
RETURNING id, name, creator, version, sections, completed
"#;

const APPEND_SECTION_BY_NAME_SQL: &str = r#"
UPDATE boards
SET sections = sections || jsonb_build_array($3::jsonb),
    version = version + 1,
    updated_at = now()
WHERE creator = $1
  AND name = $2
  AND NOT EXISTS (
    SELECT 1 FROM jsonb_array_elements(boards.sections) AS elements(section)
    WHERE section->>'title' = $4
  )
RETURNING id, name, creator, version, sections, completed
"#;

const REMOVE_SECTION_SQL: &str = r#"
UPDATE boards
SET sections = COALESCE((
        SELECT jsonb_agg(section ORDER BY position)
        FROM jsonb_array_elements(boards.sections) WITH ORDINALITY AS elements(section, position)
        WHERE section->>'title' <> $2
    ), '[]'::jsonb),
    version = version + 1,
    updated_at = now()
WHERE id = $1
  AND EXISTS (
    SELECT 1 FROM jsonb_array_elements(boards.sections) AS elements(section)
    WHERE section->>'title' = $2
  )
"#;

const APPEND_TICKET_SQL: &str = r#"
UPDATE boards
SET sections = (
        SELECT jsonb_agg(
            CASE WHEN section->>'title' = $2
                THEN jsonb_set(
                    section,
                    '{tickets}',
                    COALESCE(section->'tickets', '[]'::jsonb) || jsonb_build_array($3::jsonb)
                )
                ELSE section
            END
            ORDER BY position
        )
        FROM jsonb_array_elements(boards.sections) WITH ORDINALITY AS elements(section, position)
    ),
    version = version + 1,
    updated_at = now()
WHERE id = $1
  AND EXISTS (
    SELECT 1 FROM jsonb_array_elements(boards.sections) AS elements(section)
    WHERE section->>'title' = $2
  )
RETURNING id, name, creator, version, sections, completed
"#;

const REMOVE_TICKET_SQL: &str = r#"
UPDATE boards
SET sections = (
        SELECT jsonb_agg(
            CASE WHEN section->>'title' = $2
                THEN jsonb_set(
                    section,
                    '{tickets}',
                    COALESCE((
                        SELECT jsonb_agg(ticket ORDER BY ticket_position)
                        FROM jsonb_array_elements(COALESCE(section->'tickets', '[]'::jsonb))
                            WITH ORDINALITY AS ticket_elements(ticket, ticket_position)
                        WHERE ticket->>'id' <> $3
                    ), '[]'::jsonb)
                )
                ELSE section
            END
            ORDER BY position
        )
        FROM jsonb_array_elements(boards.sections) WITH ORDINALITY AS elements(section, position)
    ),
    version = version + 1,
    updated_at = now()
WHERE id = $1
  AND EXISTS (
    SELECT 1
    FROM jsonb_array_elements(boards.sections) AS elements(section),
         jsonb_array_elements(COALESCE(section->'tickets', '[]'::jsonb)) AS ticket_elements(ticket)
    WHERE section->>'title' = $2 AND ticket->>'id' = $3
  )
"#;

type Connection<'a> = PooledConnection<'a, AsyncPgConnection>;

/// Diesel-backed implementation of the board repository port.
#[derive(Clone)]
pub struct DieselBoardRepository {
    pool: DbPool,
}

impl DieselBoardRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<Connection<'_>, BoardRepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BoardRepositoryError::connection))
    }
}

fn map_query_error(error: diesel::result::Error) -> BoardRepositoryError {
    map_diesel_error(
        error,
        BoardRepositoryError::query,
        BoardRepositoryError::connection,
        || BoardRepositoryError::query("unexpected unique violation"),
    )
}

fn map_write_error(error: diesel::result::Error, board: &Board) -> BoardRepositoryError {
    map_diesel_error(
        error,
        BoardRepositoryError::query,
        BoardRepositoryError::connection,
        || BoardRepositoryError::duplicate_name(board.creator().as_ref(), board.name().as_ref()),
    )
}

fn to_json<T: serde::Serialize + ?Sized>(
    value: &T,
    what: &str,
) -> Result<serde_json::Value, BoardRepositoryError> {
    serde_json::to_value(value)
        .map_err(|err| BoardRepositoryError::query(format!("serialise {what}: {err}")))
}

fn to_db_version(version: u64) -> Result<i64, BoardRepositoryError> {
    i64::try_from(version)
        .map_err(|_| BoardRepositoryError::query(format!("version {version} out of range")))
}

fn from_db_version(version: i64) -> Result<u64, BoardRepositoryError> {
    u64::try_from(version)
        .map_err(|_| BoardRepositoryError::query(format!("stored version {version} is negative")))
}

fn affected(count: usize) -> Result<u64, BoardRepositoryError> {
    u64::try_from(count).map_err(|err| BoardRepositoryError::query(err.to_string()))
}

/// Convert a database row into a validated board.
fn row_to_board(row: BoardRow) -> Result<Board, BoardRepositoryError> {
    let BoardRow {
        id,
        name,
        creator,
        version,
        sections,
        completed,
    } = row;

    let sections: Vec<Section> = serde_json::from_value(sections)
        .map_err(|err| BoardRepositoryError::query(format!("decode sections: {err}")))?;
    let completed: Vec<Ticket> = serde_json::from_value(completed)
        .map_err(|err| BoardRepositoryError::query(format!("decode completed: {err}")))?;

    Board::from_parts(BoardParts {
        id: BoardId::from_uuid(id),
        name,
        creator,
        version: from_db_version(version)?,
        sections,
        completed,
    })
    .map_err(|err| BoardRepositoryError::query(err.to_string()))
}

async fn load(
    conn: &mut Connection<'_>,
    id: &BoardId,
) -> Result<Option<Board>, BoardRepositoryError> {
    boards::table
        .find(id.as_uuid())
        .select(BoardRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_query_error)?
        .map(row_to_board)
        .transpose()
}

async fn load_by_name(
    conn: &mut Connection<'_>,
    creator: &Username,
    name: &BoardName,
) -> Result<Option<Board>, BoardRepositoryError> {
    boards::table
        .filter(boards::creator.eq(creator.as_ref()))
        .filter(boards::name.eq(name.as_ref()))
        .select(BoardRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_query_error)?
        .map(row_to_board)
        .transpose()
}

#[async_trait]
impl BoardRepository for DieselBoardRepository {
    async fn insert(&self, board: &Board) -> Result<Board, BoardRepositoryError> {
        let sections = to_json(board.sections(), "sections")?;
        let completed = to_json(board.completed(), "completed")?;
        let mut conn = self.connection().await?;

        let row = diesel::insert_into(boards::table)
            .values(&NewBoardRow {
                id: *board.id().as_uuid(),
                name: board.name().as_ref(),
                creator: board.creator().as_ref(),
                version: to_db_version(board.version())?,
                sections: &sections,
                completed: &completed,
            })
            .returning(BoardRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, board))?;
        row_to_board(row)
    }

    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError> {
        let mut conn = self.connection().await?;
        load(&mut conn, id).await
    }

    async fn find_by_creator_and_name(
        &self,
        creator: &Username,
        name: &BoardName,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let mut conn = self.connection().await?;
        load_by_name(&mut conn, creator, name).await
    }

    async fn list_by_creator(
        &self,
        creator: &Username,
    ) -> Result<Vec<Board>, BoardRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<BoardRow> = boards::table
            .filter(boards::creator.eq(creator.as_ref()))
            .order((boards::created_at.asc(), boards::id.asc()))
            .select(BoardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;
        rows.into_iter().map(row_to_board).collect()
    }

    async fn delete_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError> {
        let mut conn = self.connection().await?;
        diesel::delete(boards::table.find(id.as_uuid()))
            .returning(BoardRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?
            .map(row_to_board)
            .transpose()
    }

    async fn replace(
        &self,
        board: &Board,
        expected_version: u64,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let sections = to_json(board.sections(), "sections")?;
        let completed = to_json(board.completed(), "completed")?;
        let expected = to_db_version(expected_version)?;
        let mut conn = self.connection().await?;

        let row = diesel::update(
            boards::table
                .filter(boards::id.eq(board.id().as_uuid()))
                .filter(boards::version.eq(expected)),
        )
        .set((
            &BoardUpdate {
                name: board.name().as_ref(),
                creator: board.creator().as_ref(),
                sections: &sections,
                completed: &completed,
            },
            boards::version.eq(boards::version + 1),
            boards::updated_at.eq(diesel::dsl::now),
        ))
        .returning(BoardRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_write_error(err, board))?;

        if let Some(row) = row {
            return row_to_board(row).map(Some);
        }
        match load(&mut conn, board.id()).await? {
            None => Ok(None),
            Some(current) => Err(BoardRepositoryError::version_mismatch(
                expected_version,
                current.version(),
            )),
        }
    }

    async fn append_section(
        &self,
        id: &BoardId,
        section: &Section,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let payload = to_json(section, "section")?;
        let mut conn = self.connection().await?;

        let row = sql_query(APPEND_SECTION_SQL)
            .bind::<SqlUuid, _>(id.as_uuid())
            .bind::<Jsonb, _>(&payload)
            .bind::<Text, _>(section.title().as_ref())
            .get_result::<BoardRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        if let Some(row) = row {
            return row_to_board(row).map(Some);
        }
        match load(&mut conn, id).await? {
            None => Ok(None),
            Some(_) => Err(BoardRepositoryError::duplicate_section_title(
                section.title().as_ref(),
            )),
        }
    }

    async fn append_section_by_name(
        &self,
        creator: &Username,
        name: &BoardName,
        section: &Section,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let payload = to_json(section, "section")?;
        let mut conn = self.connection().await?;

        let row = sql_query(APPEND_SECTION_BY_NAME_SQL)
            .bind::<Text, _>(creator.as_ref())
            .bind::<Text, _>(name.as_ref())
            .bind::<Jsonb, _>(&payload)
            .bind::<Text, _>(section.title().as_ref())
            .get_result::<BoardRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        if let Some(row) = row {
            return row_to_board(row).map(Some);
        }
        match load_by_name(&mut conn, creator, name).await? {
            None => Ok(None),
            Some(_) => Err(BoardRepositoryError::duplicate_section_title(
                section.title().as_ref(),
            )),
        }
    }

    async fn remove_section_by_title(
        &self,
        id: &BoardId,
        title: &SectionTitle,
    ) -> Result<u64, BoardRepositoryError> {
        let mut conn = self.connection().await?;
        let count = sql_query(REMOVE_SECTION_SQL)
            .bind::<SqlUuid, _>(id.as_uuid())
            .bind::<Text, _>(title.as_ref())
            .execute(&mut conn)
            .await
            .map_err(map_query_error)?;
        affected(count)
    }

    async fn append_ticket_to_section(
        &self,
        id: &BoardId,
        title: &SectionTitle,
        ticket: &Ticket,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let payload = to_json(ticket, "ticket")?;
        let mut conn = self.connection().await?;

        let row = sql_query(APPEND_TICKET_SQL)
            .bind::<SqlUuid, _>(id.as_uuid())
            .bind::<Text, _>(title.as_ref())
            .bind::<Jsonb, _>(&payload)
            .get_result::<BoardRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        match row {
            Some(row) => row_to_board(row).map(Some),
            None => load(&mut conn, id).await,
        }
    }

    async fn remove_ticket_from_section(
        &self,
        id: &BoardId,
        title: &SectionTitle,
        ticket_id: &TicketId,
    ) -> Result<u64, BoardRepositoryError> {
        let ticket_id = ticket_id.to_string();
        let mut conn = self.connection().await?;
        let count = sql_query(REMOVE_TICKET_SQL)
            .bind::<SqlUuid, _>(id.as_uuid())
            .bind::<Text, _>(title.as_ref())
            .bind::<Text, _>(&ticket_id)
            .execute(&mut conn)
            .await
            .map_err(map_query_error)?;
        affected(count)
    }
}

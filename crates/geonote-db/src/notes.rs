//! Note repository implementation backed by PostgreSQL + PostGIS.
//!
//! Each note row carries a `geography(Point, 4326)` column built from
//! `(longitude, latitude)` at insert time. Nearby searches use `ST_DWithin` on
//! that column, which measures geodesic distance on the WGS 84 spheroid and is
//! served by the GIST index.
//!
//! Every call runs in its own transaction with `statement_timeout` set to the
//! repository deadline, so the server aborts a statement the client has given
//! up on and nothing it wrote is committed.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;

use geonote_core::defaults::QUERY_TIMEOUT_SECS;
use geonote_core::logging::{COMPONENT_NOTES, SUBSYSTEM_DATABASE};
use geonote_core::{with_deadline, Error, NearbyQuery, Note, NoteRepository, Result};

/// SQLSTATE `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
    timeout: Duration,
}

impl PgNoteRepository {
    /// Create a repository with the default per-call deadline.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self::with_timeout(pool, Duration::from_secs(QUERY_TIMEOUT_SECS))
    }

    /// Create a repository whose calls are bounded by `timeout`.
    pub fn with_timeout(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Deadline applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Open a transaction whose statements the server cancels at the deadline.
    async fn begin_bounded(&self) -> Result<Transaction<'_, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // SET does not take bind parameters; the value is an integer.
        let set_timeout = format!(
            "SET LOCAL statement_timeout = {}",
            self.timeout.as_millis().max(1)
        );
        sqlx::query(&set_timeout)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        Ok(tx)
    }

    /// A server-side cancellation is reported the same way as a client-side one.
    fn store_error(&self, e: sqlx::Error) -> Error {
        if is_statement_timeout(&e) {
            Error::Timeout(self.timeout)
        } else {
            Error::Database(e)
        }
    }

    async fn insert_row(&self, note: &mut Note) -> Result<()> {
        let user_id = note
            .user_id
            .ok_or_else(|| Error::InvalidInput("note has no owner (user_id)".to_string()))?;

        let mut tx = self.begin_bounded().await?;
        let row = sqlx::query(
            r#"
            INSERT INTO note (user_id, latitude, longitude, text, location)
            VALUES ($1, $2, $3, $4, ST_SetSRID(ST_MakePoint($3, $2), 4326)::geography)
            RETURNING id, created_at
            "#,
        )
        .bind(user_id)
        .bind(note.latitude)
        .bind(note.longitude)
        .bind(&note.text)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| self.store_error(e))?;
        tx.commit().await.map_err(|e| self.store_error(e))?;

        note.id = Some(row.get("id"));
        note.created_at = Some(row.get("created_at"));

        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_NOTES,
            op = "insert",
            note_id = note.id,
            user_id,
            "Note inserted"
        );
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Note>> {
        let mut tx = self.begin_bounded().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, latitude, longitude, text
            FROM note
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| self.store_error(e))?;
        tx.commit().await.map_err(|e| self.store_error(e))?;

        let notes: Vec<Note> = rows.iter().map(map_row_to_listed_note).collect();
        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_NOTES,
            op = "list_all",
            result_count = notes.len(),
            "Listed notes"
        );
        Ok(notes)
    }

    async fn fetch_by_user(&self, user_id: i64) -> Result<Vec<Note>> {
        let mut tx = self.begin_bounded().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, latitude, longitude, text
            FROM note
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| self.store_error(e))?;
        tx.commit().await.map_err(|e| self.store_error(e))?;

        let notes: Vec<Note> = rows.iter().map(map_row_to_listed_note).collect();
        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_NOTES,
            op = "list_by_user",
            user_id,
            result_count = notes.len(),
            "Listed notes for user"
        );
        Ok(notes)
    }

    async fn fetch_nearby_excluding(
        &self,
        excluded_user_id: i64,
        query: &NearbyQuery,
    ) -> Result<Vec<Note>> {
        let mut tx = self.begin_bounded().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, user_id, latitude, longitude, text
            FROM note
            WHERE user_id <> $1
              AND ST_DWithin(
                  location,
                  ST_SetSRID(ST_MakePoint($3, $2), 4326)::geography,
                  $4
              )
            "#,
        )
        .bind(excluded_user_id)
        .bind(query.latitude)
        .bind(query.longitude)
        .bind(query.radius_m)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| self.store_error(e))?;
        tx.commit().await.map_err(|e| self.store_error(e))?;

        let notes: Vec<Note> = rows.iter().map(map_row_to_note).collect();
        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_NOTES,
            op = "find_nearby_for_user",
            excluded_user_id,
            radius_m = query.radius_m,
            result_count = notes.len(),
            "Nearby search finished"
        );
        Ok(notes)
    }

    async fn fetch_nearby(&self, query: &NearbyQuery) -> Result<Vec<Note>> {
        let mut tx = self.begin_bounded().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, user_id, latitude, longitude, text
            FROM note
            WHERE ST_DWithin(
                location,
                ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography,
                $3
            )
            "#,
        )
        .bind(query.latitude)
        .bind(query.longitude)
        .bind(query.radius_m)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| self.store_error(e))?;
        tx.commit().await.map_err(|e| self.store_error(e))?;

        let notes: Vec<Note> = rows.iter().map(map_row_to_note).collect();
        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_NOTES,
            op = "find_nearby",
            radius_m = query.radius_m,
            result_count = notes.len(),
            "Nearby search finished"
        );
        Ok(notes)
    }
}

/// Whether `e` is the server cancelling a statement that ran past `statement_timeout`.
fn is_statement_timeout(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => is_query_canceled_code(db.code().as_deref()),
        _ => false,
    }
}

fn is_query_canceled_code(code: Option<&str>) -> bool {
    code == Some(QUERY_CANCELED)
}

/// Map a row that projects the owner.
fn map_row_to_note(row: &PgRow) -> Note {
    Note {
        id: Some(row.get("id")),
        created_at: Some(row.get("created_at")),
        user_id: Some(row.get("user_id")),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        text: row.get("text"),
    }
}

/// Map a listing row, which does not project the owner.
fn map_row_to_listed_note(row: &PgRow) -> Note {
    Note {
        id: Some(row.get("id")),
        created_at: Some(row.get("created_at")),
        user_id: None,
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        text: row.get("text"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, note: &mut Note) -> Result<()> {
        with_deadline("insert", self.timeout, self.insert_row(note)).await
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        with_deadline("list_all", self.timeout, self.fetch_all()).await
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Note>> {
        with_deadline("list_by_user", self.timeout, self.fetch_by_user(user_id)).await
    }

    async fn find_nearby_for_user(
        &self,
        excluded_user_id: i64,
        query: &NearbyQuery,
    ) -> Result<Vec<Note>> {
        query.validate()?;
        with_deadline(
            "find_nearby_for_user",
            self.timeout,
            self.fetch_nearby_excluding(excluded_user_id, query),
        )
        .await
    }

    async fn find_nearby(&self, query: &NearbyQuery) -> Result<Vec<Note>> {
        query.validate()?;
        with_deadline("find_nearby", self.timeout, self.fetch_nearby(query)).await
    }
}

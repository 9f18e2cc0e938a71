//! SQLite-backed [`NoteStore`] implementation.
//!
//! A [`SqliteSession`] wraps one connection checked out of the pool. Every
//! statement runs in SQLite's autocommit mode, so each write is durable
//! once the call returns. Insert and update re-read the row they wrote.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite};

use notes_core::models::{NewNote, Note};
use notes_core::store::NoteStore;

/// One request-scoped database session.
///
/// Dropping it returns the connection to the pool.
pub struct SqliteSession {
    conn: PoolConnection<Sqlite>,
}

impl SqliteSession {
    pub fn new(conn: PoolConnection<Sqlite>) -> Self {
        Self { conn }
    }

    async fn fetch(&mut self, id: i64) -> Result<Option<Note>> {
        let row = sqlx::query("SELECT id, title, content, timestamp FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        row.as_ref().map(note_from_row).transpose()
    }
}

fn note_from_row(row: &SqliteRow) -> Result<Note> {
    let millis: i64 = row.get("timestamp");
    let timestamp = DateTime::<Utc>::from_timestamp_millis(millis)
        .with_context(|| format!("invalid note timestamp: {}", millis))?;
    Ok(Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        timestamp,
    })
}

#[async_trait]
impl NoteStore for SqliteSession {
    async fn insert(&mut self, note: &NewNote) -> Result<Note> {
        let result = sqlx::query("INSERT INTO notes (title, content, timestamp) VALUES (?, ?, ?)")
            .bind(&note.title)
            .bind(&note.content)
            .bind(note.timestamp.timestamp_millis())
            .execute(&mut *self.conn)
            .await?;

        let id = result.last_insert_rowid();
        self.fetch(id)
            .await?
            .with_context(|| format!("inserted note {} could not be re-read", id))
    }

    async fn find(&mut self, id: i64) -> Result<Option<Note>> {
        self.fetch(id).await
    }

    async fn update(&mut self, note: &Note) -> Result<Option<Note>> {
        let result = sqlx::query("UPDATE notes SET title = ?, content = ? WHERE id = ?")
            .bind(&note.title)
            .bind(&note.content)
            .bind(note.id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch(note.id).await
    }

    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

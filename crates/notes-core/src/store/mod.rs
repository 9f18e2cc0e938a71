//! Storage abstraction for Secure Notes.
//!
//! A [`NoteStore`] value is one scoped storage session: the caller acquires
//! it at the start of a request and drops it at the end, which releases
//! whatever connection backs it. Sessions are never shared between
//! concurrent requests, so methods take `&mut self`.
//!
//! Consistency between concurrent sessions is left to the backend.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{NewNote, Note};

/// Scoped storage session over the `notes` table.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert`](NoteStore::insert) | Persist a new note and re-read it |
/// | [`find`](NoteStore::find) | Primary-key lookup |
/// | [`update`](NoteStore::update) | Persist title/content of an existing note and re-read it |
/// | [`delete`](NoteStore::delete) | Remove a note permanently |
#[async_trait]
pub trait NoteStore: Send {
    /// Insert a note. Returns the stored row, including its assigned id.
    async fn insert(&mut self, note: &NewNote) -> Result<Note>;

    /// Look up a note by id.
    async fn find(&mut self, id: i64) -> Result<Option<Note>>;

    /// Write `title` and `content` of an existing note. Returns the stored
    /// row, or `None` if the note no longer exists.
    async fn update(&mut self, note: &Note) -> Result<Option<Note>>;

    /// Delete a note by id. Returns `false` if no such note existed.
    async fn delete(&mut self, id: i64) -> Result<bool>;
}

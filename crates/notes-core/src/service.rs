//! Note use-case service.
//!
//! [`NoteService`] is the only component with business logic. It owns one
//! scoped storage session for the lifetime of a request and translates
//! create/get/update/delete intents into [`NoteStore`] calls.
//!
//! # Invariants
//! - `update` and `delete` look the note up first and report
//!   [`NoteError::NotFound`] without writing if it is absent.
//! - `update` replaces a field only when the supplied value is non-empty
//!   and never touches `timestamp`.
//! - Storage errors propagate unchanged as [`NoteError::Storage`]; nothing
//!   is retried.

use thiserror::Error;

use crate::models::{NewNote, Note, NoteUpdate};
use crate::store::NoteStore;

/// Service error for note use-cases.
#[derive(Debug, Error)]
pub enum NoteError {
    /// No note with this id exists.
    #[error("note not found: {0}")]
    NotFound(i64),
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type NoteResult<T> = Result<T, NoteError>;

/// Note operations over one storage session.
///
/// Dropping the service drops the session, which releases its connection.
pub struct NoteService<S> {
    store: S,
}

impl<S: NoteStore> NoteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a note stamped with the current time.
    pub async fn create(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> NoteResult<Note> {
        let note = self.store.insert(&NewNote::new(title, content)).await?;
        tracing::debug!(id = note.id, "note created");
        Ok(note)
    }

    pub async fn get(&mut self, id: i64) -> NoteResult<Note> {
        self.store.find(id).await?.ok_or(NoteError::NotFound(id))
    }

    /// Apply a partial update.
    ///
    /// If the update leaves the note unchanged, the current row is returned
    /// and nothing is written.
    pub async fn update(&mut self, id: i64, update: &NoteUpdate) -> NoteResult<Note> {
        let mut note = self.get(id).await?;
        if !update.apply(&mut note) {
            return Ok(note);
        }
        let note = self
            .store
            .update(&note)
            .await?
            .ok_or(NoteError::NotFound(id))?;
        tracing::debug!(id, "note updated");
        Ok(note)
    }

    /// Delete a note, returning its last-known values.
    pub async fn delete(&mut self, id: i64) -> NoteResult<Note> {
        let note = self.get(id).await?;
        if !self.store.delete(id).await? {
            return Err(NoteError::NotFound(id));
        }
        tracing::debug!(id, "note deleted");
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{InMemoryNoteStore, InMemorySession};

    fn service(store: &InMemoryNoteStore) -> NoteService<InMemorySession> {
        NoteService::new(store.session())
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let store = InMemoryNoteStore::new();
        let mut svc = service(&store);
        let a = svc.create("Test Note", "This is a test.").await.unwrap();
        let b = svc.create("Test Note", "This is a test.").await.unwrap();
        assert_eq!(a.title, "Test Note");
        assert_eq!(a.content, "This is a test.");
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_get_returns_created_note() {
        let store = InMemoryNoteStore::new();
        let created = service(&store).create("Another Note", "More content").await.unwrap();
        let fetched = service(&store).get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = InMemoryNoteStore::new();
        let err = service(&store).get(99).await.unwrap_err();
        assert!(matches!(err, NoteError::NotFound(99)));
    }

    #[tokio::test]
    async fn test_update_title_keeps_content() {
        let store = InMemoryNoteStore::new();
        let mut svc = service(&store);
        let created = svc.create("Old Title", "Old content").await.unwrap();
        let updated = svc
            .update(created.id, &NoteUpdate::new(Some("X".into()), None))
            .await
            .unwrap();
        assert_eq!(updated.title, "X");
        assert_eq!(updated.content, "Old content");
        assert_eq!(updated.timestamp, created.timestamp);
    }

    #[tokio::test]
    async fn test_update_content_keeps_title() {
        let store = InMemoryNoteStore::new();
        let mut svc = service(&store);
        let created = svc.create("Old Title", "Old content").await.unwrap();
        let updated = svc
            .update(created.id, &NoteUpdate::new(None, Some("Y".into())))
            .await
            .unwrap();
        assert_eq!(updated.title, "Old Title");
        assert_eq!(updated.content, "Y");
    }

    #[tokio::test]
    async fn test_update_with_empty_values_is_noop() {
        let store = InMemoryNoteStore::new();
        let mut svc = service(&store);
        let created = svc.create("Keep", "Me").await.unwrap();
        let writes = store.writes();
        let updated = svc
            .update(
                created.id,
                &NoteUpdate::new(Some(String::new()), Some(String::new())),
            )
            .await
            .unwrap();
        assert_eq!(updated, created);
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_update_missing_performs_no_write() {
        let store = InMemoryNoteStore::new();
        let err = service(&store)
            .update(5, &NoteUpdate::new(Some("X".into()), Some("Y".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, NoteError::NotFound(5)));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = InMemoryNoteStore::new();
        let mut svc = service(&store);
        let created = svc.create("Temp Note", "Temp content").await.unwrap();
        let deleted = svc.delete(created.id).await.unwrap();
        assert_eq!(deleted, created);
        assert!(matches!(svc.get(created.id).await, Err(NoteError::NotFound(_))));
        assert!(matches!(svc.delete(created.id).await, Err(NoteError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = InMemoryNoteStore::new();
        store.set_unavailable(true);
        let err = service(&store).create("a", "b").await.unwrap_err();
        assert!(matches!(err, NoteError::Storage(_)));
        assert_eq!(err.to_string(), "note store unavailable");
    }
}

//! In-memory [`NoteStore`] implementation for testing.
//!
//! All sessions handed out by one [`InMemoryNoteStore`] share the same
//! `BTreeMap` behind a `std::sync::RwLock`. Ids come from a counter that
//! only moves forward, so a deleted id is never handed out again.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::models::{NewNote, Note};

use super::NoteStore;

#[derive(Default)]
struct State {
    last_id: i64,
    notes: BTreeMap<i64, Note>,
    writes: usize,
    unavailable: bool,
}

/// Shared in-memory note table.
#[derive(Clone, Default)]
pub struct InMemoryNoteStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session over the shared table.
    pub fn session(&self) -> InMemorySession {
        InMemorySession {
            state: Arc::clone(&self.state),
        }
    }

    /// Number of durable writes (insert, update, delete) performed so far.
    pub fn writes(&self) -> usize {
        self.state.read().map(|s| s.writes).unwrap_or(0)
    }

    /// Number of notes currently stored.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.notes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every subsequent operation fail, simulating a lost connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.state.write() {
            state.unavailable = unavailable;
        }
    }
}

/// One session over an [`InMemoryNoteStore`].
pub struct InMemorySession {
    state: Arc<RwLock<State>>,
}

impl InMemorySession {
    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        let state = self
            .state
            .read()
            .map_err(|_| anyhow!("note store lock poisoned"))?;
        if state.unavailable {
            bail!("note store unavailable");
        }
        Ok(state)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        let state = self
            .state
            .write()
            .map_err(|_| anyhow!("note store lock poisoned"))?;
        if state.unavailable {
            bail!("note store unavailable");
        }
        Ok(state)
    }
}

#[async_trait]
impl NoteStore for InMemorySession {
    async fn insert(&mut self, note: &NewNote) -> Result<Note> {
        let mut state = self.write()?;
        state.last_id += 1;
        let stored = Note {
            id: state.last_id,
            title: note.title.clone(),
            content: note.content.clone(),
            timestamp: note.timestamp,
        };
        state.notes.insert(stored.id, stored.clone());
        state.writes += 1;
        Ok(stored)
    }

    async fn find(&mut self, id: i64) -> Result<Option<Note>> {
        Ok(self.read()?.notes.get(&id).cloned())
    }

    async fn update(&mut self, note: &Note) -> Result<Option<Note>> {
        let mut state = self.write()?;
        let updated = match state.notes.get_mut(&note.id) {
            Some(existing) => {
                existing.title = note.title.clone();
                existing.content = note.content.clone();
                existing.clone()
            }
            None => return Ok(None),
        };
        state.writes += 1;
        Ok(Some(updated))
    }

    async fn delete(&mut self, id: i64) -> Result<bool> {
        let mut state = self.write()?;
        let removed = state.notes.remove(&id).is_some();
        if removed {
            state.writes += 1;
        }
        Ok(removed)
    }
}

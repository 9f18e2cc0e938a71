//! Note data model.
//!
//! A [`Note`] is the only persisted entity. Its `id` is assigned by the
//! store on insert and never changes or gets reused; `timestamp` records
//! the creation time and is not touched by updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted note.
///
/// Serializes as `{"id", "title", "content", "timestamp"}` with the
/// timestamp rendered as an RFC 3339 / ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A note that has not been persisted yet (no id).
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Field-level partial update.
///
/// A field is replaced only when it is supplied *and* non-empty. An empty
/// string is treated the same as an omitted field, so an update can never
/// clear a field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NoteUpdate {
    pub fn new(title: Option<String>, content: Option<String>) -> Self {
        Self { title, content }
    }

    /// Apply this update to `note` in place. Returns `true` if any field changed.
    pub fn apply(&self, note: &mut Note) -> bool {
        let mut changed = false;
        if let Some(title) = supplied(&self.title) {
            if note.title != title {
                note.title = title.to_string();
                changed = true;
            }
        }
        if let Some(content) = supplied(&self.content) {
            if note.content != content {
                note.content = content.to_string();
                changed = true;
            }
        }
        changed
    }
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

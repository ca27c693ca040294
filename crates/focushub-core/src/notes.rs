//! Free-form markdown notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to notes whose own title is blank but which carry content.
pub const UNTITLED_NOTE_TITLE: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    /// Markdown body, stored verbatim.
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl NoteItem {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            updated_at,
        }
    }
}

/// Partial update for a note. A patch that would leave both title and
/// content blank is refused whole.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

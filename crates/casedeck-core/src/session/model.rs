//! Session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CasedeckError, Result};

/// Longest title the remote store accepts for a session.
pub const MAX_SESSION_TITLE_LEN: usize = 255;

/// A named container grouping one document-analysis pass and its test cases.
///
/// Identity is `id`; two values with the same id describe the same session,
/// possibly at different points in time (e.g. before and after a rename).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier assigned by the remote store
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
    /// Name of the document uploaded into this session, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Session {
    /// Returns a copy of this session carrying `title`.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// Checks a session title before it is sent to the remote store.
///
/// Returns the trimmed title.
pub fn validate_session_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CasedeckError::validation("title", "session title is required"));
    }
    if trimmed.chars().count() > MAX_SESSION_TITLE_LEN {
        return Err(CasedeckError::validation(
            "title",
            format!("session title must be at most {MAX_SESSION_TITLE_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

use casedeck_core::error::Result;
use casedeck_core::session::Session;
use serde::{Deserialize, Serialize};

use super::{non_empty, parse_timestamp};

/// Session as returned by `/api/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDto {
    pub id: String,
    pub title: String,
    pub created_at: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl SessionDto {
    pub fn into_domain(self) -> Result<Session> {
        Ok(Session {
            created_at: parse_timestamp("created_at", &self.created_at)?,
            id: self.id,
            title: self.title,
            file_name: non_empty(self.file_name),
        })
    }
}

/// Body of session create and rename requests.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTitleBody<'a> {
    pub title: &'a str,
}

/// Converts a session list, dropping soft-deleted rows.
pub(crate) fn sessions_into_domain(dtos: Vec<SessionDto>) -> Result<Vec<Session>> {
    dtos.into_iter()
        .filter(|dto| !dto.is_deleted)
        .map(SessionDto::into_domain)
        .collect()
}

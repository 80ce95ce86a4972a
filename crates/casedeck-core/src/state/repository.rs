//! Active session persistence trait.

use async_trait::async_trait;

use crate::error::Result;

/// Durable storage of the last active session id.
///
/// Read on every change of the known-sessions collection, written on every
/// successful switch, erased on clear or when the id turns out to dangle.
#[async_trait]
pub trait ActiveSessionRepository: Send + Sync {
    async fn get_active_session(&self) -> Option<String>;

    async fn set_active_session(&self, session_id: String) -> Result<()>;

    async fn clear_active_session(&self) -> Result<()>;
}

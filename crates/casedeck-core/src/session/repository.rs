//! Session repository trait.
//!
//! Defines the interface for the remote session collection.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the remote session collection.
///
/// The remote store is the sole source of truth; implementations never
/// keep their own copy of the collection.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Lists all sessions known to the remote store.
    async fn list(&self) -> Result<Vec<Session>>;

    /// Creates a session with the given title and returns the stored record.
    async fn create(&self, title: &str) -> Result<Session>;

    /// Renames a session and returns the stored record.
    ///
    /// # Returns
    ///
    /// - `Ok(Session)`: the session as the remote store now holds it
    /// - `Err(_)`: the update was rejected or the call failed
    async fn update(&self, session_id: &str, title: &str) -> Result<Session>;

    /// Deletes a session.
    async fn delete(&self, session_id: &str) -> Result<()>;
}

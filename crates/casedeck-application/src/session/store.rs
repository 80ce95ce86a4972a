use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use casedeck_core::error::{CasedeckError, Result};
use casedeck_core::notification::Notification;
use casedeck_core::session::Session;
use casedeck_core::state::ActiveSessionRepository;
use casedeck_core::test_case::TestCase;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::cache::{CachePartition, MutationCache};
use crate::events::{Notifier, StoreEvent};

/// Load state of the session list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadPhase {
    /// Nothing fetched yet, or torn down.
    #[default]
    Uninitialized,
    /// The session list is being fetched.
    Loading,
    /// The session list has been fetched at least once.
    Ready,
}

/// Title given to sessions created without user input, e.g. `Analysis session 05-01 14:30`.
pub fn default_session_title(now: DateTime<Local>) -> String {
    format!("Analysis session {}", now.format("%m-%d %H:%M"))
}

#[derive(Debug, Default)]
struct StoreState {
    phase: LoadPhase,
    /// Snapshot of the active session. Resolved against the cached list on
    /// read; only replaced in place after a confirmed rename.
    active: Option<Session>,
}

/// Owns the active-session pointer and its durable persistence.
///
/// The active session is a reference into the authoritative session list
/// held by the [`MutationCache`]. Session writes go through the cache; the
/// store only adjusts its pointer once the remote store has confirmed them.
pub struct SessionStore {
    cache: Arc<MutationCache>,
    persisted: Arc<dyn ActiveSessionRepository>,
    notifier: Notifier,
    state: RwLock<StoreState>,
    /// Bumped on every change of the active pointer; used to discard late
    /// responses that belong to a previous selection.
    generation: AtomicU64,
}

impl SessionStore {
    pub fn new(cache: Arc<MutationCache>, persisted: Arc<dyn ActiveSessionRepository>) -> Self {
        let notifier = cache.notifier().clone();
        Self {
            cache,
            persisted,
            notifier,
            state: RwLock::new(StoreState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &Arc<MutationCache> {
        &self.cache
    }

    /// Registers a new event subscriber.
    pub fn subscribe(&self) -> UnboundedReceiver<StoreEvent> {
        self.notifier.subscribe()
    }

    pub async fn phase(&self) -> LoadPhase {
        self.state.read().await.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// True when `session_id` is still active and no switch happened since `generation`.
    pub async fn is_current(&self, session_id: &str, generation: u64) -> bool {
        self.generation() == generation
            && self.active_session_id().await.as_deref() == Some(session_id)
    }

    async fn set_phase(&self, phase: LoadPhase) {
        let changed = {
            let mut state = self.state.write().await;
            let changed = state.phase != phase;
            state.phase = phase;
            changed
        };
        if changed {
            tracing::debug!("[SessionStore] Phase -> {:?}", phase);
            self.notifier.emit(StoreEvent::PhaseChanged(phase));
        }
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Fetches the session list and restores the persisted selection.
    ///
    /// Resolves to `Ready` as soon as the fetch completes, even when the
    /// list is empty. A failed fetch returns to `Uninitialized`.
    pub async fn init(&self) -> Result<()> {
        tracing::info!("[SessionStore] Initializing");
        self.set_phase(LoadPhase::Loading).await;

        match self.cache.sessions().await {
            Ok(sessions) => {
                self.restore(&sessions).await;
                self.set_phase(LoadPhase::Ready).await;
                tracing::info!("[SessionStore] Ready with {} session(s)", sessions.len());
                Ok(())
            }
            Err(e) => {
                self.set_phase(LoadPhase::Uninitialized).await;
                self.notifier
                    .notify(Notification::error(format!("Failed to load sessions: {e}")));
                Err(e)
            }
        }
    }

    /// Closes every subscription and resets in-memory state.
    ///
    /// The persisted id is kept so the next `init` can restore it.
    pub async fn teardown(&self) {
        {
            let mut state = self.state.write().await;
            *state = StoreState::default();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cache.clear().await;
        self.notifier.close_all();
        tracing::info!("[SessionStore] Torn down");
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// The known sessions, from cache while fresh.
    pub async fn sessions(&self) -> Result<Vec<Session>> {
        self.cache.sessions().await
    }

    pub async fn active_session_id(&self) -> Option<String> {
        self.state.read().await.active.as_ref().map(|s| s.id.clone())
    }

    /// The active session as the authoritative list currently describes it.
    ///
    /// Falls back to the last merged snapshot when the list is not cached
    /// or stale.
    pub async fn active_session(&self) -> Option<Session> {
        let snapshot = self.state.read().await.active.clone()?;
        match self.cache.fresh_sessions().await {
            Some(sessions) => Some(
                sessions
                    .into_iter()
                    .find(|s| s.id == snapshot.id)
                    .unwrap_or(snapshot),
            ),
            None => Some(snapshot),
        }
    }

    /// Test cases of the active session.
    ///
    /// Returns `Ok(None)` when the active session changed while the fetch
    /// was in flight; the late result is discarded. Without an active
    /// session the list is empty.
    pub async fn active_test_cases(&self) -> Result<Option<Vec<TestCase>>> {
        let generation = self.generation();
        let Some(session_id) = self.active_session_id().await else {
            return Ok(Some(Vec::new()));
        };

        let cases = self.cache.test_cases(&session_id).await?;

        if !self.is_current(&session_id, generation).await {
            tracing::warn!(
                "[SessionStore] Discarding test cases of {}: active session changed",
                session_id
            );
            return Ok(None);
        }
        Ok(Some(cases))
    }

    // ============================================================================
    // Restoration
    // ============================================================================

    /// Re-applies the persisted selection to `known_sessions`.
    ///
    /// A persisted id found in the list becomes active; one that is missing
    /// is erased and the pointer left unset. Runs on every change of the
    /// known-sessions list.
    pub async fn restore(&self, known_sessions: &[Session]) -> Option<Session> {
        let Some(persisted_id) = self.persisted.get_active_session().await else {
            return self.state.read().await.active.clone();
        };

        match known_sessions.iter().find(|s| s.id == persisted_id) {
            Some(session) => {
                let changed = {
                    let mut state = self.state.write().await;
                    let changed = state.active.as_ref() != Some(session);
                    if state.active.as_ref().map(|s| s.id.as_str()) != Some(session.id.as_str()) {
                        self.generation.fetch_add(1, Ordering::SeqCst);
                    }
                    state.active = Some(session.clone());
                    changed
                };
                if changed {
                    tracing::info!("[SessionStore] Restored active session {}", session.id);
                    self.notifier
                        .emit(StoreEvent::ActiveSessionChanged(Some(session.clone())));
                }
                Some(session.clone())
            }
            None => {
                let stale = CasedeckError::stale_reference("session", &persisted_id);
                tracing::warn!("[SessionStore] {}, clearing", stale);
                if let Err(e) = self.persisted.clear_active_session().await {
                    tracing::error!("[SessionStore] Failed to clear persisted session: {}", e);
                }
                self.clear_pointer_if(&persisted_id).await;
                None
            }
        }
    }

    /// Re-fetches the session list and reconciles the active pointer with it.
    pub async fn refresh_sessions(&self) -> Result<Vec<Session>> {
        self.cache.refresh(&CachePartition::Sessions).await?;
        let sessions = self.cache.sessions().await?;
        self.restore(&sessions).await;

        let vanished = self
            .active_session_id()
            .await
            .filter(|active_id| !sessions.iter().any(|s| &s.id == active_id));
        if let Some(active_id) = vanished {
            tracing::warn!(
                "[SessionStore] Active session {} no longer exists, clearing",
                active_id
            );
            if let Err(e) = self.persisted.clear_active_session().await {
                tracing::error!("[SessionStore] Failed to clear persisted session: {}", e);
            }
            self.clear_pointer_if(&active_id).await;
        }
        Ok(sessions)
    }

    // ============================================================================
    // Selection
    // ============================================================================

    /// Makes `session` active, or clears the selection with `None`.
    ///
    /// Selecting the already active session is a no-op and emits nothing.
    pub async fn switch(&self, session: Option<&Session>) -> Result<()> {
        let Some(session) = session else {
            self.persisted.clear_active_session().await?;
            self.set_active(None).await;
            tracing::info!("[SessionStore] Cleared active session");
            return Ok(());
        };

        if self.active_session_id().await.as_deref() == Some(session.id.as_str()) {
            tracing::debug!("[SessionStore] {} already active", session.id);
            return Ok(());
        }

        self.activate(session).await?;
        self.notifier.notify(Notification::success(format!(
            "Switched to session: {}",
            session.title
        )));
        Ok(())
    }

    /// Sets and persists `session` as active without the no-op check.
    async fn activate(&self, session: &Session) -> Result<()> {
        self.persisted.set_active_session(session.id.clone()).await?;
        self.set_active(Some(session.clone())).await;
        tracing::info!(
            "[SessionStore] Active session -> {} ({})",
            session.id,
            session.title
        );
        Ok(())
    }

    async fn set_active(&self, session: Option<Session>) {
        self.state.write().await.active = session.clone();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.notifier.emit(StoreEvent::ActiveSessionChanged(session));
    }

    /// Clears the pointer if it still points at `session_id`.
    async fn clear_pointer_if(&self, session_id: &str) {
        let cleared = {
            let mut state = self.state.write().await;
            if state.active.as_ref().is_some_and(|s| s.id == session_id) {
                state.active = None;
                true
            } else {
                false
            }
        };
        if cleared {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.notifier.emit(StoreEvent::ActiveSessionChanged(None));
        }
    }

    // ============================================================================
    // Session writes
    // ============================================================================

    /// Creates a session and makes it active.
    pub async fn create(&self, title: &str) -> Result<Session> {
        let session = self.cache.create_session(title).await?;
        self.activate(&session).await?;
        Ok(session)
    }

    /// Creates a session with a timestamped default title.
    pub async fn request_new_session(&self) -> Result<Session> {
        self.create(&default_session_title(Local::now())).await
    }

    /// Renames a session. The active snapshot takes the confirmed title.
    pub async fn rename(&self, session: &Session, new_title: &str) -> Result<Session> {
        let updated = self.cache.rename_session(&session.id, new_title).await?;

        let merged = {
            let mut state = self.state.write().await;
            match state.active.as_mut() {
                Some(active) if active.id == updated.id => {
                    *active = active.with_title(updated.title.clone());
                    Some(active.clone())
                }
                _ => None,
            }
        };
        if let Some(active) = merged {
            tracing::debug!("[SessionStore] Active session retitled to {}", active.title);
            self.notifier
                .emit(StoreEvent::ActiveSessionChanged(Some(active)));
        }
        Ok(updated)
    }

    /// Deletes a session. Deleting the active one clears the selection
    /// without picking another.
    pub async fn delete(&self, session: &Session) -> Result<()> {
        self.cache.delete_session(&session.id).await?;

        if self.persisted.get_active_session().await.as_deref() == Some(session.id.as_str()) {
            if let Err(e) = self.persisted.clear_active_session().await {
                tracing::error!("[SessionStore] Failed to clear persisted session: {}", e);
            }
        }
        self.clear_pointer_if(&session.id).await;
        Ok(())
    }
}

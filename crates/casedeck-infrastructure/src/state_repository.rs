//! Active session persistence.
//!
//! `FileStateRepository` keeps the last active session id in a TOML file
//! and caches it in memory to avoid repeated file reads.
//! `MemoryStateRepository` keeps it in memory only.

use casedeck_core::error::{CasedeckError, Result};
use casedeck_core::state::{ActiveSessionRepository, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::AtomicTomlFile;

/// File-backed `ActiveSessionRepository`.
///
/// # Example
///
/// ```ignore
/// use casedeck_infrastructure::FileStateRepository;
///
/// let repo = FileStateRepository::open(path).await?;
/// repo.set_active_session("s1".to_string()).await?;
/// assert_eq!(repo.get_active_session().await, Some("s1".to_string()));
/// ```
#[derive(Clone)]
pub struct FileStateRepository {
    /// Cached copy of the file contents.
    state: Arc<Mutex<AppState>>,
    file: Arc<AtomicTomlFile<AppState>>,
}

impl FileStateRepository {
    /// Opens the state file at `path`, loading its contents.
    ///
    /// A missing file is not created until the first write. A corrupt file is
    /// treated as empty and overwritten on the next write.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let file = Arc::new(AtomicTomlFile::<AppState>::new(path));

        let loader = file.clone();
        let loaded = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| CasedeckError::internal(format!("Failed to join task: {}", e)))?;

        let initial_state = match loaded {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    "[FileStateRepository] Ignoring unreadable state file {:?}: {}",
                    file.path(),
                    e
                );
                AppState::default()
            }
        };

        Ok(Self {
            state: Arc::new(Mutex::new(initial_state)),
            file,
        })
    }

    async fn save_state(&self, state: AppState) -> Result<()> {
        let file = self.file.clone();
        let state_for_save = state.clone();
        tokio::task::spawn_blocking(move || file.save(&state_for_save))
            .await
            .map_err(|e| CasedeckError::internal(format!("Failed to join task: {}", e)))??;

        // Cache only after the file write succeeded
        *self.state.lock().await = state;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ActiveSessionRepository for FileStateRepository {
    async fn get_active_session(&self) -> Option<String> {
        self.state.lock().await.active_session_id.clone()
    }

    async fn set_active_session(&self, session_id: String) -> Result<()> {
        let mut state = self.state.lock().await.clone();
        state.active_session_id = Some(session_id);
        self.save_state(state).await
    }

    async fn clear_active_session(&self) -> Result<()> {
        let mut state = self.state.lock().await.clone();
        if state.active_session_id.is_none() {
            return Ok(());
        }
        state.active_session_id = None;
        self.save_state(state).await
    }
}

/// In-memory `ActiveSessionRepository`.
#[derive(Clone, Default)]
pub struct MemoryStateRepository {
    state: Arc<Mutex<AppState>>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `session_id` already persisted.
    pub fn with_active_session(session_id: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState {
                active_session_id: Some(session_id.into()),
            })),
        }
    }
}

#[async_trait::async_trait]
impl ActiveSessionRepository for MemoryStateRepository {
    async fn get_active_session(&self) -> Option<String> {
        self.state.lock().await.active_session_id.clone()
    }

    async fn set_active_session(&self, session_id: String) -> Result<()> {
        self.state.lock().await.active_session_id = Some(session_id);
        Ok(())
    }

    async fn clear_active_session(&self) -> Result<()> {
        self.state.lock().await.active_session_id = None;
        Ok(())
    }
}

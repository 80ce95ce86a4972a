use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use casedeck_core::ai_config::{AiConfiguration, AiConfigurationDraft, AiConfigurationRepository};
use casedeck_core::error::{CasedeckError, Result};
use casedeck_core::notification::Notification;
use casedeck_core::session::{Session, SessionRepository, validate_session_title};
use casedeck_core::test_case::{TestCase, TestCaseDraft, TestCasePatch, TestCaseRepository};
use tokio::sync::RwLock;

use super::busy::{BusyGuard, BusySlots};
use super::partition::{CachePartition, Mutation, MutationKind};
use crate::events::Notifier;

/// The remote collections behind the cache.
#[derive(Clone)]
pub struct RemoteCollections {
    pub sessions: Arc<dyn SessionRepository>,
    pub test_cases: Arc<dyn TestCaseRepository>,
    pub ai_configurations: Arc<dyn AiConfigurationRepository>,
}

impl RemoteCollections {
    /// Uses one client for every collection.
    pub fn from_client<C>(client: Arc<C>) -> Self
    where
        C: SessionRepository + TestCaseRepository + AiConfigurationRepository + 'static,
    {
        Self {
            sessions: client.clone(),
            test_cases: client.clone(),
            ai_configurations: client,
        }
    }
}

/// A cached copy of one partition.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    stale: bool,
}

impl<T> CacheEntry<T> {
    fn fresh(data: T) -> Self {
        Self { data, stale: false }
    }
}

#[derive(Default)]
struct CacheState {
    sessions: Option<CacheEntry<Vec<Session>>>,
    test_cases: HashMap<String, CacheEntry<Vec<TestCase>>>,
    ai_configurations: Option<CacheEntry<Vec<AiConfiguration>>>,
}

impl CacheState {
    fn contains(&self, partition: &CachePartition) -> bool {
        match partition {
            CachePartition::Sessions => self.sessions.is_some(),
            CachePartition::TestCases(id) => self.test_cases.contains_key(id),
            CachePartition::AiConfigurations => self.ai_configurations.is_some(),
        }
    }

    fn mark_stale(&mut self, partition: &CachePartition) {
        match partition {
            CachePartition::Sessions => {
                if let Some(entry) = self.sessions.as_mut() {
                    entry.stale = true;
                }
            }
            CachePartition::TestCases(id) => {
                if let Some(entry) = self.test_cases.get_mut(id) {
                    entry.stale = true;
                }
            }
            CachePartition::AiConfigurations => {
                if let Some(entry) = self.ai_configurations.as_mut() {
                    entry.stale = true;
                }
            }
        }
    }

    fn remove(&mut self, partition: &CachePartition) {
        match partition {
            CachePartition::Sessions => self.sessions = None,
            CachePartition::TestCases(id) => {
                self.test_cases.remove(id);
            }
            CachePartition::AiConfigurations => self.ai_configurations = None,
        }
    }

    fn is_stale(&self, partition: &CachePartition) -> Option<bool> {
        match partition {
            CachePartition::Sessions => self.sessions.as_ref().map(|e| e.stale),
            CachePartition::TestCases(id) => self.test_cases.get(id).map(|e| e.stale),
            CachePartition::AiConfigurations => self.ai_configurations.as_ref().map(|e| e.stale),
        }
    }
}

/// Local copies of the remote collections, kept consistent by
/// invalidate-and-refetch after every successful write.
///
/// There is no optimistic merge: a mutation's effect becomes visible only
/// once the re-fetch of the partitions it invalidated has completed. A
/// failed mutation invalidates nothing, and a failed re-fetch keeps the
/// previous (stale) data so the next read retries.
pub struct MutationCache {
    remote: RemoteCollections,
    state: RwLock<CacheState>,
    busy: BusySlots,
    notifier: Notifier,
}

impl MutationCache {
    pub fn new(remote: RemoteCollections, notifier: Notifier) -> Self {
        Self {
            remote,
            state: RwLock::new(CacheState::default()),
            busy: BusySlots::new(),
            notifier,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn is_busy(&self, kind: MutationKind) -> bool {
        self.busy.is_busy(kind)
    }

    /// Whether the partition is cached and stale. `None` when not cached.
    pub async fn is_stale(&self, partition: &CachePartition) -> Option<bool> {
        self.state.read().await.is_stale(partition)
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// The session list; served from cache while fresh.
    pub async fn sessions(&self) -> Result<Vec<Session>> {
        {
            let state = self.state.read().await;
            if let Some(entry) = state.sessions.as_ref().filter(|e| !e.stale) {
                tracing::debug!("[MutationCache] Cache hit: sessions");
                return Ok(entry.data.clone());
            }
        }
        self.fetch_sessions().await
    }

    /// The test cases of one session; served from cache while fresh.
    pub async fn test_cases(&self, session_id: &str) -> Result<Vec<TestCase>> {
        {
            let state = self.state.read().await;
            if let Some(entry) = state.test_cases.get(session_id).filter(|e| !e.stale) {
                tracing::debug!("[MutationCache] Cache hit: test-cases/{}", session_id);
                return Ok(entry.data.clone());
            }
        }
        self.fetch_test_cases(session_id).await
    }

    /// The AI configuration list; served from cache while fresh.
    pub async fn ai_configurations(&self) -> Result<Vec<AiConfiguration>> {
        {
            let state = self.state.read().await;
            if let Some(entry) = state.ai_configurations.as_ref().filter(|e| !e.stale) {
                tracing::debug!("[MutationCache] Cache hit: ai-configurations");
                return Ok(entry.data.clone());
            }
        }
        self.fetch_ai_configurations().await
    }

    /// The session list if cached and fresh, without a remote call.
    pub async fn fresh_sessions(&self) -> Option<Vec<Session>> {
        let state = self.state.read().await;
        state
            .sessions
            .as_ref()
            .filter(|e| !e.stale)
            .map(|e| e.data.clone())
    }

    /// Last known test cases of a session, fresh or stale, without a remote call.
    pub async fn cached_test_cases(&self, session_id: &str) -> Option<Vec<TestCase>> {
        let state = self.state.read().await;
        state.test_cases.get(session_id).map(|e| e.data.clone())
    }

    /// Forces a re-fetch of one partition.
    pub async fn refresh(&self, partition: &CachePartition) -> Result<()> {
        self.state.write().await.mark_stale(partition);
        self.fetch(partition).await
    }

    /// Drops every cached partition.
    pub async fn clear(&self) {
        *self.state.write().await = CacheState::default();
        tracing::debug!("[MutationCache] Cleared");
    }

    async fn fetch(&self, partition: &CachePartition) -> Result<()> {
        match partition {
            CachePartition::Sessions => self.fetch_sessions().await.map(|_| ()),
            CachePartition::TestCases(id) => self.fetch_test_cases(id).await.map(|_| ()),
            CachePartition::AiConfigurations => self.fetch_ai_configurations().await.map(|_| ()),
        }
    }

    async fn fetch_sessions(&self) -> Result<Vec<Session>> {
        tracing::debug!("[MutationCache] Fetching sessions");
        let sessions = self.remote.sessions.list().await.inspect_err(|e| {
            tracing::error!("[MutationCache] Failed to fetch sessions: {}", e);
        })?;
        self.state.write().await.sessions = Some(CacheEntry::fresh(sessions.clone()));
        Ok(sessions)
    }

    async fn fetch_test_cases(&self, session_id: &str) -> Result<Vec<TestCase>> {
        tracing::debug!("[MutationCache] Fetching test-cases/{}", session_id);
        let cases = self
            .remote
            .test_cases
            .list(session_id)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "[MutationCache] Failed to fetch test cases of {}: {}",
                    session_id,
                    e
                );
            })?;
        self.state
            .write()
            .await
            .test_cases
            .insert(session_id.to_string(), CacheEntry::fresh(cases.clone()));
        Ok(cases)
    }

    async fn fetch_ai_configurations(&self) -> Result<Vec<AiConfiguration>> {
        tracing::debug!("[MutationCache] Fetching ai-configurations");
        let configs = self
            .remote
            .ai_configurations
            .list()
            .await
            .inspect_err(|e| {
                tracing::error!("[MutationCache] Failed to fetch AI configurations: {}", e);
            })?;
        self.state.write().await.ai_configurations = Some(CacheEntry::fresh(configs.clone()));
        Ok(configs)
    }

    // ============================================================================
    // Writes
    // ============================================================================

    /// Runs a remote write under its busy guard, then invalidates and
    /// re-fetches exactly the partitions the mutation may have changed.
    ///
    /// Returns once the re-fetch has completed. On failure nothing is
    /// invalidated and an error notification is emitted.
    pub async fn execute<T, F, Fut>(&self, mutation: Mutation, call: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _guard: BusyGuard = self.busy.acquire(mutation.kind())?;

        let value = match call().await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("[MutationCache] {} failed: {}", mutation.kind(), e);
                self.notifier.notify(Notification::error(format!(
                    "Failed to {}: {}",
                    mutation.kind(),
                    e
                )));
                return Err(e);
            }
        };

        tracing::info!("[MutationCache] {} succeeded", mutation.kind());
        self.invalidate(&mutation).await;
        self.notifier
            .notify(Notification::success(mutation.success_message()));
        Ok(value)
    }

    /// Drops the partitions `mutation` evicts, marks the other cached
    /// partitions it invalidates stale, then re-fetches those. Partitions
    /// that were never loaded are fetched on next read.
    async fn invalidate(&self, mutation: &Mutation) {
        let evicted = mutation.evicts();
        let loaded: Vec<CachePartition> = {
            let mut state = self.state.write().await;
            for partition in &evicted {
                if state.contains(partition) {
                    tracing::debug!("[MutationCache] Evicted {}", partition);
                    state.remove(partition);
                }
            }
            let loaded: Vec<CachePartition> = mutation
                .invalidates()
                .into_iter()
                .filter(|p| !evicted.contains(p) && state.contains(p))
                .collect();
            for partition in &loaded {
                state.mark_stale(partition);
            }
            loaded
        };

        for partition in &loaded {
            tracing::debug!("[MutationCache] Invalidated {}", partition);
            if let Err(e) = self.fetch(partition).await {
                tracing::warn!(
                    "[MutationCache] Re-fetch of {} failed, keeping stale data: {}",
                    partition,
                    e
                );
            }
        }
    }

    pub async fn create_session(&self, title: &str) -> Result<Session> {
        let title = validate_session_title(title)?;
        self.execute(Mutation::CreateSession, || {
            self.remote.sessions.create(&title)
        })
        .await
    }

    pub async fn rename_session(&self, session_id: &str, title: &str) -> Result<Session> {
        let title = validate_session_title(title)?;
        self.execute(
            Mutation::RenameSession {
                session_id: session_id.to_string(),
            },
            || self.remote.sessions.update(session_id, &title),
        )
        .await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.execute(
            Mutation::DeleteSession {
                session_id: session_id.to_string(),
            },
            || self.remote.sessions.delete(session_id),
        )
        .await
    }

    pub async fn create_test_case(&self, draft: &TestCaseDraft) -> Result<TestCase> {
        draft.validate()?;
        self.execute(
            Mutation::CreateTestCase {
                session_id: draft.session_id.clone(),
            },
            || self.remote.test_cases.create(draft),
        )
        .await
    }

    pub async fn update_test_case(
        &self,
        session_id: &str,
        case_id: &str,
        patch: &TestCasePatch,
    ) -> Result<TestCase> {
        if patch.is_empty() {
            return Err(CasedeckError::validation("patch", "nothing to update"));
        }
        patch.validate()?;
        self.execute(
            Mutation::UpdateTestCase {
                session_id: session_id.to_string(),
            },
            || self.remote.test_cases.update(case_id, patch),
        )
        .await
    }

    pub async fn delete_test_case(&self, session_id: &str, case_id: &str) -> Result<()> {
        self.execute(
            Mutation::DeleteTestCase {
                session_id: session_id.to_string(),
            },
            || self.remote.test_cases.delete(case_id),
        )
        .await
    }

    pub async fn create_ai_configuration(
        &self,
        draft: &AiConfigurationDraft,
    ) -> Result<AiConfiguration> {
        draft.validate()?;
        self.execute(Mutation::CreateAiConfiguration, || {
            self.remote.ai_configurations.create(draft)
        })
        .await
    }
}

//! In-memory remote store with failure injection, shared by the
//! behavioural tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use casedeck_application::{MutationCache, Notifier, RemoteCollections, SessionStore, StoreEvent};
use casedeck_core::ai_config::{AiConfiguration, AiConfigurationDraft, AiConfigurationRepository};
use casedeck_core::document::{AnalysisSummary, DocumentPipeline, UploadFile, UploadedDocument};
use casedeck_core::error::{CasedeckError, Result};
use casedeck_core::session::{Session, SessionRepository};
use casedeck_core::state::ActiveSessionRepository;
use casedeck_core::test_case::{
    CaseLevel, CaseStatus, CaseType, TestCase, TestCaseDraft, TestCasePatch, TestCaseRepository,
};
use casedeck_infrastructure::MemoryStateRepository;
use chrono::Utc;
use tokio::sync::Notify;
use tokio::sync::mpsc::UnboundedReceiver;

pub fn session(id: &str, title: &str) -> Session {
    Session {
        id: id.to_string(),
        title: title.to_string(),
        created_at: Utc::now(),
        file_name: None,
    }
}

pub fn test_case(id: &str, session_id: &str, title: &str) -> TestCase {
    TestCase {
        id: id.to_string(),
        session_id: session_id.to_string(),
        title: title.to_string(),
        group_name: None,
        maintainer: None,
        precondition: None,
        step_description: None,
        expected_result: None,
        case_level: CaseLevel::default(),
        case_type: CaseType::default(),
        status: CaseStatus::default(),
        test_suggestions: None,
        execution_time_minutes: 30,
        created_at: Utc::now(),
    }
}

#[derive(Default)]
struct Collections {
    sessions: Vec<Session>,
    test_cases: Vec<TestCase>,
    ai_configurations: Vec<AiConfiguration>,
    documents: Vec<UploadedDocument>,
}

/// Pauses `test_cases.list` until released.
struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

/// Fake remote store.
///
/// Operations are named `<collection>.<op>`, e.g. `sessions.list`; every
/// call is recorded and any operation can be made to fail.
#[derive(Default)]
pub struct FakeRemote {
    data: Mutex<Collections>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    gate: Mutex<Option<Gate>>,
    generated_per_analysis: Mutex<usize>,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_sessions(sessions: Vec<Session>) -> Arc<Self> {
        let remote = Self::default();
        remote.data.lock().unwrap().sessions = sessions;
        Arc::new(remote)
    }

    pub fn insert_test_case(&self, case: TestCase) {
        self.data.lock().unwrap().test_cases.push(case);
    }

    pub fn remove_session_remotely(&self, session_id: &str) {
        self.data
            .lock()
            .unwrap()
            .sessions
            .retain(|s| s.id != session_id);
    }

    pub fn set_generated_per_analysis(&self, count: usize) {
        *self.generated_per_analysis.lock().unwrap() = count;
    }

    pub fn fail(&self, operation: &str) {
        self.failing.lock().unwrap().insert(operation.to_string());
    }

    pub fn recover(&self, operation: &str) {
        self.failing.lock().unwrap().remove(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Makes the next `test_cases.list` calls wait. Returns `(entered, release)`.
    pub fn gate_test_case_lists(&self) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Gate {
            entered: entered.clone(),
            release: release.clone(),
        });
        (entered, release)
    }

    fn enter(&self, operation: &str) -> Result<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(CasedeckError::remote_status(
                operation,
                500,
                "injected failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for FakeRemote {
    async fn list(&self) -> Result<Vec<Session>> {
        self.enter("sessions.list")?;
        Ok(self.data.lock().unwrap().sessions.clone())
    }

    async fn create(&self, title: &str) -> Result<Session> {
        self.enter("sessions.create")?;
        let created = session(&uuid::Uuid::new_v4().to_string(), title);
        self.data.lock().unwrap().sessions.insert(0, created.clone());
        Ok(created)
    }

    async fn update(&self, session_id: &str, title: &str) -> Result<Session> {
        self.enter("sessions.update")?;
        let mut data = self.data.lock().unwrap();
        let stored = data
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| CasedeckError::remote_status("sessions.update", 404, "Session not found"))?;
        stored.title = title.to_string();
        Ok(stored.clone())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.enter("sessions.delete")?;
        let mut data = self.data.lock().unwrap();
        data.sessions.retain(|s| s.id != session_id);
        data.test_cases.retain(|c| c.session_id != session_id);
        Ok(())
    }
}

#[async_trait]
impl TestCaseRepository for FakeRemote {
    async fn list(&self, session_id: &str) -> Result<Vec<TestCase>> {
        self.enter("test_cases.list")?;
        let gate = self
            .gate
            .lock()
            .unwrap()
            .as_ref()
            .map(|g| (g.entered.clone(), g.release.clone()));
        if let Some((entered, release)) = gate {
            entered.notify_one();
            release.notified().await;
        }
        Ok(self
            .data
            .lock()
            .unwrap()
            .test_cases
            .iter()
            .filter(|c| c.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &TestCaseDraft) -> Result<TestCase> {
        self.enter("test_cases.create")?;
        let mut created = test_case(
            &uuid::Uuid::new_v4().to_string(),
            &draft.session_id,
            &draft.title,
        );
        created.group_name = draft.group_name.clone();
        created.step_description = draft.step_description.clone();
        created.case_level = draft.case_level;
        created.case_type = draft.case_type;
        created.status = draft.status;
        created.execution_time_minutes = draft.execution_time_minutes;
        self.data.lock().unwrap().test_cases.push(created.clone());
        Ok(created)
    }

    async fn update(&self, case_id: &str, patch: &TestCasePatch) -> Result<TestCase> {
        self.enter("test_cases.update")?;
        let mut data = self.data.lock().unwrap();
        let stored = data
            .test_cases
            .iter_mut()
            .find(|c| c.id == case_id)
            .ok_or_else(|| CasedeckError::remote_status("test_cases.update", 404, "Test case not found"))?;
        if let Some(title) = &patch.title {
            stored.title = title.clone();
        }
        if let Some(level) = patch.case_level {
            stored.case_level = level;
        }
        if let Some(status) = patch.status {
            stored.status = status;
        }
        Ok(stored.clone())
    }

    async fn delete(&self, case_id: &str) -> Result<()> {
        self.enter("test_cases.delete")?;
        self.data
            .lock()
            .unwrap()
            .test_cases
            .retain(|c| c.id != case_id);
        Ok(())
    }
}

#[async_trait]
impl AiConfigurationRepository for FakeRemote {
    async fn list(&self) -> Result<Vec<AiConfiguration>> {
        self.enter("ai_configurations.list")?;
        Ok(self.data.lock().unwrap().ai_configurations.clone())
    }

    async fn create(&self, draft: &AiConfigurationDraft) -> Result<AiConfiguration> {
        self.enter("ai_configurations.create")?;
        let created = AiConfiguration {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: draft.user_id.clone().unwrap_or_else(|| "default".to_string()),
            provider: draft.provider.clone(),
            api_endpoint: draft.api_endpoint.clone(),
            model_name: draft.model_name.clone(),
            api_key: draft.api_key.clone(),
            is_active: draft.is_active,
            created_at: Utc::now(),
        };
        self.data
            .lock()
            .unwrap()
            .ai_configurations
            .push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl DocumentPipeline for FakeRemote {
    async fn upload(&self, file: &UploadFile, session_id: &str) -> Result<UploadedDocument> {
        self.enter("documents.upload")?;
        let mut data = self.data.lock().unwrap();
        let document = UploadedDocument {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            file_name: file.file_name.clone(),
            extracted_content: Some(String::from_utf8_lossy(&file.bytes).into_owned()),
        };
        if let Some(stored) = data.sessions.iter_mut().find(|s| s.id == session_id) {
            stored.title = file.file_name.clone();
            stored.file_name = Some(file.file_name.clone());
        }
        data.documents.push(document.clone());
        Ok(document)
    }

    async fn analyze(&self, file_id: &str, session_id: &str) -> Result<AnalysisSummary> {
        self.enter("documents.analyze")?;
        let count = *self.generated_per_analysis.lock().unwrap();
        let mut data = self.data.lock().unwrap();
        if !data.documents.iter().any(|d| d.id == file_id) {
            return Err(CasedeckError::remote_status(
                "documents.analyze",
                404,
                "File not found",
            ));
        }
        for i in 0..count {
            data.test_cases.push(test_case(
                &uuid::Uuid::new_v4().to_string(),
                session_id,
                &format!("Generated case {}", i + 1),
            ));
        }
        Ok(AnalysisSummary {
            success: true,
            message: format!("Generated {count} test cases"),
            test_cases_count: count as u32,
        })
    }
}

/// A wired-up state layer over a [`FakeRemote`].
pub struct Harness {
    pub remote: Arc<FakeRemote>,
    pub persisted: Arc<MemoryStateRepository>,
    pub cache: Arc<MutationCache>,
    pub store: Arc<SessionStore>,
    pub events: UnboundedReceiver<StoreEvent>,
}

impl Harness {
    pub fn new(remote: Arc<FakeRemote>, persisted: MemoryStateRepository) -> Self {
        let persisted = Arc::new(persisted);
        let notifier = Notifier::new();
        let events = notifier.subscribe();
        let cache = Arc::new(MutationCache::new(
            RemoteCollections::from_client(remote.clone()),
            notifier,
        ));
        let store = Arc::new(SessionStore::new(
            cache.clone(),
            persisted.clone() as Arc<dyn ActiveSessionRepository>,
        ));
        Self {
            remote,
            persisted,
            cache,
            store,
            events,
        }
    }

    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self::new(FakeRemote::with_sessions(sessions), MemoryStateRepository::new())
    }

    /// Drains the events published so far.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Messages of the notifications published so far.
    pub fn drain_messages(&mut self) -> Vec<String> {
        self.drain_events()
            .into_iter()
            .filter_map(|event| match event {
                StoreEvent::Notification(n) => Some(n.message),
                _ => None,
            })
            .collect()
    }
}

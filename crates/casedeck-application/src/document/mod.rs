//! Requirements document upload and analysis for the active session.

use std::path::Path;
use std::sync::Arc;

use casedeck_core::document::{AnalysisSummary, DocumentPipeline, UploadFile, UploadedDocument};
use casedeck_core::error::{CasedeckError, Result};
use casedeck_core::notification::Notification;

use crate::cache::Mutation;
use crate::session::SessionStore;

/// Uploads documents into the active session and triggers test-case generation.
pub struct DocumentService {
    pipeline: Arc<dyn DocumentPipeline>,
    store: Arc<SessionStore>,
}

impl DocumentService {
    pub fn new(pipeline: Arc<dyn DocumentPipeline>, store: Arc<SessionStore>) -> Self {
        Self { pipeline, store }
    }

    async fn require_active_session(&self) -> Result<String> {
        self.store.active_session_id().await.ok_or_else(|| {
            CasedeckError::validation("session", "create or select a session before uploading")
        })
    }

    /// Validates and uploads `file` into the active session.
    pub async fn upload(&self, file: UploadFile) -> Result<UploadedDocument> {
        let session_id = self.require_active_session().await?;
        file.validate()?;
        let generation = self.store.generation();

        tracing::info!(
            "[DocumentService] Uploading {} into session {}",
            file.file_name,
            session_id
        );
        let document = self
            .store
            .cache()
            .execute(
                Mutation::UploadDocument {
                    session_id: session_id.clone(),
                },
                || self.pipeline.upload(&file, &session_id),
            )
            .await?;

        self.report_if_superseded(&session_id, generation).await;
        Ok(document)
    }

    /// Reads a document from disk and uploads it.
    pub async fn upload_path(&self, path: &Path) -> Result<UploadedDocument> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| CasedeckError::validation("file", "path has no file name"))?;
        let bytes = tokio::fs::read(path).await?;
        self.upload(UploadFile::new(file_name, bytes)).await
    }

    /// Generates test cases from an uploaded document into the active session.
    pub async fn analyze(&self, file_id: &str) -> Result<AnalysisSummary> {
        let session_id = self.require_active_session().await?;
        let generation = self.store.generation();

        tracing::info!(
            "[DocumentService] Analyzing {} for session {}",
            file_id,
            session_id
        );
        let summary = self
            .store
            .cache()
            .execute(
                Mutation::AnalyzeDocument {
                    session_id: session_id.clone(),
                },
                || self.pipeline.analyze(file_id, &session_id),
            )
            .await?;

        tracing::info!(
            "[DocumentService] Generated {} test cases for session {}",
            summary.test_cases_count,
            session_id
        );
        self.report_if_superseded(&session_id, generation).await;
        Ok(summary)
    }

    /// Reports a result that arrived after the user moved to another session.
    async fn report_if_superseded(&self, session_id: &str, generation: u64) {
        if !self.store.is_current(session_id, generation).await {
            tracing::warn!(
                "[DocumentService] Result for session {} arrived after the active session changed",
                session_id
            );
            self.store.cache().notifier().notify(Notification::info(
                "The finished document belongs to a session that is no longer active",
            ));
        }
    }
}

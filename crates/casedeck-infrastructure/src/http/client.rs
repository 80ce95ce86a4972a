//! HttpApiClient - REST client for the casedeck server.
//!
//! One client implements every remote repository trait, so a single
//! connection pool is shared by the whole state layer.

use async_trait::async_trait;
use casedeck_core::ai_config::{AiConfiguration, AiConfigurationDraft, AiConfigurationRepository};
use casedeck_core::document::{AnalysisSummary, DocumentPipeline, UploadFile, UploadedDocument};
use casedeck_core::error::{CasedeckError, Result};
use casedeck_core::session::{Session, SessionRepository};
use casedeck_core::test_case::{TestCase, TestCaseDraft, TestCasePatch, TestCaseRepository};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::dto::{
    AiConfigurationDto, AnalyzeRequestDto, AnalyzeResponseDto, SessionDto, SessionTitleBody,
    TestCaseCreateBody, TestCaseDto, TestCaseUpdateBody, UploadResponseDto, sessions_into_domain,
};

/// Error body FastAPI-style servers send on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// REST client for the remote store.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    /// Creates a client from the resolved configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CasedeckError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config.base_url()))
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let operation = format!("{} /api/{}", method, path.trim_start_matches('/'));
        tracing::debug!("[HttpApiClient] {}", operation);
        (self.client.request(method, self.url(path)), operation)
    }

    async fn send(builder: RequestBuilder, operation: &str) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("[HttpApiClient] {} failed: {}", operation, e);
            CasedeckError::remote(operation, e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        tracing::error!(
            "[HttpApiClient] {} returned {}: {}",
            operation,
            status.as_u16(),
            message
        );
        Err(CasedeckError::remote_status(operation, status.as_u16(), message))
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder, operation: &str) -> Result<T> {
        let response = Self::send(builder, operation).await?;
        response.json::<T>().await.map_err(|e| CasedeckError::Serialization {
            format: "JSON".to_string(),
            message: format!("{operation}: {e}"),
        })
    }
}

/// Extracts a readable message from an error body.
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(detail) => Some(detail),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl SessionRepository for HttpApiClient {
    async fn list(&self) -> Result<Vec<Session>> {
        let (builder, operation) = self.request(Method::GET, "sessions");
        let dtos: Vec<SessionDto> = Self::send_json(builder, &operation).await?;
        sessions_into_domain(dtos)
    }

    async fn create(&self, title: &str) -> Result<Session> {
        let (builder, operation) = self.request(Method::POST, "sessions");
        let dto: SessionDto =
            Self::send_json(builder.json(&SessionTitleBody { title }), &operation).await?;
        dto.into_domain()
    }

    async fn update(&self, session_id: &str, title: &str) -> Result<Session> {
        let (builder, operation) = self.request(Method::PUT, &format!("sessions/{session_id}"));
        let dto: SessionDto =
            Self::send_json(builder.json(&SessionTitleBody { title }), &operation).await?;
        dto.into_domain()
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let (builder, operation) = self.request(Method::DELETE, &format!("sessions/{session_id}"));
        Self::send(builder, &operation).await?;
        Ok(())
    }
}

#[async_trait]
impl TestCaseRepository for HttpApiClient {
    async fn list(&self, session_id: &str) -> Result<Vec<TestCase>> {
        let (builder, operation) = self.request(Method::GET, &format!("test-cases/{session_id}"));
        let dtos: Vec<TestCaseDto> = Self::send_json(builder, &operation).await?;
        dtos.into_iter().map(TestCaseDto::into_domain).collect()
    }

    async fn create(&self, draft: &TestCaseDraft) -> Result<TestCase> {
        let (builder, operation) = self.request(Method::POST, "test-cases");
        let dto: TestCaseDto =
            Self::send_json(builder.json(&TestCaseCreateBody::from(draft)), &operation).await?;
        dto.into_domain()
    }

    async fn update(&self, case_id: &str, patch: &TestCasePatch) -> Result<TestCase> {
        let (builder, operation) = self.request(Method::PUT, &format!("test-cases/{case_id}"));
        let dto: TestCaseDto =
            Self::send_json(builder.json(&TestCaseUpdateBody::from(patch)), &operation).await?;
        dto.into_domain()
    }

    async fn delete(&self, case_id: &str) -> Result<()> {
        let (builder, operation) = self.request(Method::DELETE, &format!("test-cases/{case_id}"));
        Self::send(builder, &operation).await?;
        Ok(())
    }
}

#[async_trait]
impl AiConfigurationRepository for HttpApiClient {
    async fn list(&self) -> Result<Vec<AiConfiguration>> {
        let (builder, operation) = self.request(Method::GET, "ai-config");
        let dtos: Vec<AiConfigurationDto> = Self::send_json(builder, &operation).await?;
        dtos.into_iter().map(AiConfigurationDto::into_domain).collect()
    }

    async fn create(&self, draft: &AiConfigurationDraft) -> Result<AiConfiguration> {
        let (builder, operation) = self.request(Method::POST, "ai-config");
        let dto: AiConfigurationDto = Self::send_json(builder.json(draft), &operation).await?;
        dto.into_domain()
    }
}

#[async_trait]
impl DocumentPipeline for HttpApiClient {
    async fn upload(&self, file: &UploadFile, session_id: &str) -> Result<UploadedDocument> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let form = Form::new()
            .part("file", part)
            .text("session_id", session_id.to_string());

        let (builder, operation) = self.request(Method::POST, "upload");
        let dto: UploadResponseDto = Self::send_json(builder.multipart(form), &operation).await?;
        tracing::info!(
            "[HttpApiClient] Uploaded {} ({} bytes) as {}",
            file.file_name,
            file.bytes.len(),
            dto.id
        );
        Ok(dto.into())
    }

    async fn analyze(&self, file_id: &str, session_id: &str) -> Result<AnalysisSummary> {
        let (builder, operation) = self.request(Method::POST, "analyze");
        let dto: AnalyzeResponseDto = Self::send_json(
            builder.json(&AnalyzeRequestDto {
                file_id,
                session_id,
            }),
            &operation,
        )
        .await?;
        if !dto.success {
            return Err(CasedeckError::remote(operation, dto.message));
        }
        Ok(dto.into())
    }
}

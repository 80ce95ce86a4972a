//! Requirements document upload and analysis.
//!
//! Both steps are opaque remote calls: upload stores the document and
//! extracts its text, analyze asks the server to generate test cases from it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CasedeckError, Result};

/// Extensions the analysis pipeline can read.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["pdf", "docx", "doc", "txt", "md"];
/// Largest document accepted for upload (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A document ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lower-cased extension without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Checks format and size before anything is sent.
    pub fn validate(&self) -> Result<()> {
        let supported = self
            .extension()
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
        if !supported {
            return Err(CasedeckError::validation(
                "file",
                format!(
                    "unsupported file format '{}', expected one of: {}",
                    self.file_name,
                    SUPPORTED_EXTENSIONS
                        .iter()
                        .map(|ext| format!(".{ext}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ));
        }
        if self.bytes.is_empty() {
            return Err(CasedeckError::validation("file", "file is empty"));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(CasedeckError::validation(
                "file",
                format!(
                    "file must not exceed {}MB",
                    MAX_UPLOAD_BYTES / 1024 / 1024
                ),
            ));
        }
        Ok(())
    }
}

/// The stored document as reported by the upload call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub id: String,
    pub session_id: String,
    pub file_name: String,
    #[serde(default)]
    pub extracted_content: Option<String>,
}

/// Result of a server-side analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub success: bool,
    pub message: String,
    pub test_cases_count: u32,
}

/// The remote upload/analyze pipeline.
#[async_trait]
pub trait DocumentPipeline: Send + Sync {
    async fn upload(&self, file: &UploadFile, session_id: &str) -> Result<UploadedDocument>;

    async fn analyze(&self, file_id: &str, session_id: &str) -> Result<AnalysisSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extension_is_case_insensitive() {
        let file = UploadFile::new("PRD.DOCX", vec![1, 2, 3]);
        assert_eq!(file.extension().as_deref(), Some("docx"));
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_rejects_unsupported_and_oversized() {
        assert!(UploadFile::new("image.png", vec![1]).validate().is_err());
        assert!(UploadFile::new("noext", vec![1]).validate().is_err());
        assert!(UploadFile::new("empty.md", Vec::new()).validate().is_err());
        let big = UploadFile::new("big.txt", vec![0; MAX_UPLOAD_BYTES + 1]);
        assert!(big.validate().unwrap_err().is_validation());
    }
}

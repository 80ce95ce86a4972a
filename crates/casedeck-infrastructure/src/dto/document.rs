use casedeck_core::document::{AnalysisSummary, UploadedDocument};
use serde::{Deserialize, Serialize};

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponseDto {
    pub id: String,
    pub session_id: String,
    pub file_name: String,
    #[serde(default)]
    pub extracted_content: Option<String>,
}

impl From<UploadResponseDto> for UploadedDocument {
    fn from(dto: UploadResponseDto) -> Self {
        Self {
            id: dto.id,
            session_id: dto.session_id,
            file_name: dto.file_name,
            extracted_content: dto.extracted_content,
        }
    }
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequestDto<'a> {
    pub file_id: &'a str,
    pub session_id: &'a str,
}

/// Response of `POST /api/analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponseDto {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub test_cases_count: u32,
}

impl From<AnalyzeResponseDto> for AnalysisSummary {
    fn from(dto: AnalyzeResponseDto) -> Self {
        Self {
            success: dto.success,
            message: dto.message,
            test_cases_count: dto.test_cases_count,
        }
    }
}

//! Test case domain model.
//!
//! Optional wire fields are resolved to their defaults once, when a record
//! enters the domain, so nothing downstream re-applies defaulting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CasedeckError, Result};

/// Longest title the remote store accepts for a test case.
pub const MAX_TITLE_LEN: usize = 500;
/// Lower bound of `execution_time_minutes`.
pub const MIN_EXECUTION_MINUTES: u32 = 1;
/// Upper bound of `execution_time_minutes` (one working day).
pub const MAX_EXECUTION_MINUTES: u32 = 480;
/// Execution time assumed when none was recorded.
pub const DEFAULT_EXECUTION_MINUTES: u32 = 30;

/// Priority of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaseLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl CaseLevel {
    pub const ALL: [CaseLevel; 3] = [CaseLevel::High, CaseLevel::Medium, CaseLevel::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseLevel::High => "High",
            CaseLevel::Medium => "Medium",
            CaseLevel::Low => "Low",
        }
    }

    /// Parses a stored label, accepting the localized labels older records carry.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim() {
            "高" => Some(CaseLevel::High),
            "中" => Some(CaseLevel::Medium),
            "低" => Some(CaseLevel::Low),
            other => Self::ALL
                .into_iter()
                .find(|level| level.as_str().eq_ignore_ascii_case(other)),
        }
    }
}

/// Kind of verification a test case performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaseType {
    #[default]
    Functional,
    Performance,
    Security,
    Compatibility,
    Interface,
}

impl CaseType {
    pub const ALL: [CaseType; 5] = [
        CaseType::Functional,
        CaseType::Performance,
        CaseType::Security,
        CaseType::Compatibility,
        CaseType::Interface,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseType::Functional => "Functional",
            CaseType::Performance => "Performance",
            CaseType::Security => "Security",
            CaseType::Compatibility => "Compatibility",
            CaseType::Interface => "Interface",
        }
    }

    /// Parses a stored label, accepting the localized labels older records carry.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim() {
            "功能测试" => Some(CaseType::Functional),
            "性能测试" => Some(CaseType::Performance),
            "安全测试" => Some(CaseType::Security),
            "兼容性测试" => Some(CaseType::Compatibility),
            "接口测试" => Some(CaseType::Interface),
            other => Self::ALL
                .into_iter()
                .find(|kind| kind.as_str().eq_ignore_ascii_case(other)),
        }
    }
}

/// Execution status of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaseStatus {
    #[default]
    Pending,
    Running,
    Passed,
    Failed,
    Blocked,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 5] = [
        CaseStatus::Pending,
        CaseStatus::Running,
        CaseStatus::Passed,
        CaseStatus::Failed,
        CaseStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "Pending",
            CaseStatus::Running => "Running",
            CaseStatus::Passed => "Passed",
            CaseStatus::Failed => "Failed",
            CaseStatus::Blocked => "Blocked",
        }
    }

    /// Parses a stored label, accepting the localized labels older records carry.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim() {
            "待执行" => Some(CaseStatus::Pending),
            "执行中" => Some(CaseStatus::Running),
            "已通过" => Some(CaseStatus::Passed),
            "已失败" => Some(CaseStatus::Failed),
            "已阻塞" => Some(CaseStatus::Blocked),
            other => Self::ALL
                .into_iter()
                .find(|status| status.as_str().eq_ignore_ascii_case(other)),
        }
    }
}

macro_rules! impl_label_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl std::str::FromStr for $ty {
                type Err = CasedeckError;

                fn from_str(s: &str) -> Result<Self> {
                    Self::parse_label(s).ok_or_else(|| {
                        CasedeckError::validation(stringify!($ty), format!("unknown value '{s}'"))
                    })
                }
            }
        )*
    };
}

impl_label_display!(CaseLevel, CaseType, CaseStatus);

/// One verification record tied to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    /// Owning session; a test case never moves between sessions
    pub session_id: String,
    pub title: String,
    pub group_name: Option<String>,
    pub maintainer: Option<String>,
    pub precondition: Option<String>,
    /// Numbered sub-steps separated by line breaks
    pub step_description: Option<String>,
    pub expected_result: Option<String>,
    pub case_level: CaseLevel,
    pub case_type: CaseType,
    pub status: CaseStatus,
    pub test_suggestions: Option<String>,
    pub execution_time_minutes: u32,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseDraft {
    pub session_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precondition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
    #[serde(default)]
    pub case_level: CaseLevel,
    #[serde(default)]
    pub case_type: CaseType,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_suggestions: Option<String>,
    #[serde(default = "default_execution_minutes")]
    pub execution_time_minutes: u32,
}

fn default_execution_minutes() -> u32 {
    DEFAULT_EXECUTION_MINUTES
}

impl TestCaseDraft {
    /// Creates a draft with only the required fields set.
    pub fn new(session_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            title: title.into(),
            group_name: None,
            maintainer: None,
            precondition: None,
            step_description: None,
            expected_result: None,
            case_level: CaseLevel::default(),
            case_type: CaseType::default(),
            status: CaseStatus::default(),
            test_suggestions: None,
            execution_time_minutes: DEFAULT_EXECUTION_MINUTES,
        }
    }

    /// Checks the draft before it is sent to the remote store.
    pub fn validate(&self) -> Result<()> {
        if self.session_id.trim().is_empty() {
            return Err(CasedeckError::validation(
                "session_id",
                "a session must be selected before creating test cases",
            ));
        }
        validate_title(&self.title)?;
        validate_execution_minutes(self.execution_time_minutes)
    }
}

/// Partial update of a test case; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCasePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precondition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_level: Option<CaseLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_type: Option<CaseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_suggestions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_minutes: Option<u32>,
}

impl TestCasePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks the fields that are present.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(minutes) = self.execution_time_minutes {
            validate_execution_minutes(minutes)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CasedeckError::validation("title", "test case title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CasedeckError::validation(
            "title",
            format!("test case title must be at most {MAX_TITLE_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_execution_minutes(minutes: u32) -> Result<()> {
    if !(MIN_EXECUTION_MINUTES..=MAX_EXECUTION_MINUTES).contains(&minutes) {
        return Err(CasedeckError::validation(
            "execution_time_minutes",
            format!(
                "must be between {MIN_EXECUTION_MINUTES} and {MAX_EXECUTION_MINUTES} minutes, got {minutes}"
            ),
        ));
    }
    Ok(())
}

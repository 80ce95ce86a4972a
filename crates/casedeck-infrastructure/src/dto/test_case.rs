use casedeck_core::error::Result;
use casedeck_core::test_case::{
    CaseLevel, CaseStatus, CaseType, DEFAULT_EXECUTION_MINUTES, MAX_EXECUTION_MINUTES,
    MIN_EXECUTION_MINUTES, TestCase, TestCaseDraft, TestCasePatch,
};
use serde::{Deserialize, Serialize};

use super::{non_empty, parse_timestamp};

/// Test case as returned by `/api/test-cases`.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCaseDto {
    pub id: String,
    pub session_id: String,
    pub title: String,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub maintainer: Option<String>,
    #[serde(default)]
    pub precondition: Option<String>,
    #[serde(default)]
    pub step_description: Option<String>,
    #[serde(default)]
    pub expected_result: Option<String>,
    #[serde(default)]
    pub case_level: Option<String>,
    #[serde(default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub test_suggestions: Option<String>,
    #[serde(default)]
    pub execution_time_minutes: Option<i64>,
    pub created_at: String,
}

impl TestCaseDto {
    /// Converts into the domain model, resolving every default.
    pub fn into_domain(self) -> Result<TestCase> {
        let case_level = resolve_label(&self.id, "case_level", self.case_level, CaseLevel::parse_label);
        let case_type = resolve_label(&self.id, "case_type", self.case_type, CaseType::parse_label);
        let status = resolve_label(&self.id, "status", self.status, CaseStatus::parse_label);
        let execution_time_minutes = resolve_minutes(&self.id, self.execution_time_minutes);

        Ok(TestCase {
            created_at: parse_timestamp("created_at", &self.created_at)?,
            id: self.id,
            session_id: self.session_id,
            title: self.title,
            group_name: non_empty(self.group_name),
            maintainer: non_empty(self.maintainer),
            precondition: non_empty(self.precondition),
            step_description: non_empty(self.step_description),
            expected_result: non_empty(self.expected_result),
            case_level,
            case_type,
            status,
            test_suggestions: non_empty(self.test_suggestions),
            execution_time_minutes,
        })
    }
}

/// Absent or empty → default; unknown → default with a warning.
fn resolve_label<T: Default>(
    case_id: &str,
    field: &str,
    raw: Option<String>,
    parse: fn(&str) -> Option<T>,
) -> T {
    let Some(raw) = non_empty(raw) else {
        return T::default();
    };
    parse(&raw).unwrap_or_else(|| {
        tracing::warn!(
            "[TestCaseDto] Unknown {} '{}' on test case {}, using default",
            field,
            raw,
            case_id
        );
        T::default()
    })
}

fn resolve_minutes(case_id: &str, raw: Option<i64>) -> u32 {
    let Some(minutes) = raw else {
        return DEFAULT_EXECUTION_MINUTES;
    };
    let clamped = minutes.clamp(MIN_EXECUTION_MINUTES as i64, MAX_EXECUTION_MINUTES as i64) as u32;
    if clamped as i64 != minutes {
        tracing::warn!(
            "[TestCaseDto] execution_time_minutes {} out of range on test case {}, clamped to {}",
            minutes,
            case_id,
            clamped
        );
    }
    clamped
}

/// Body of `POST /api/test-cases`.
#[derive(Debug, Clone, Serialize)]
pub struct TestCaseCreateBody<'a> {
    pub session_id: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precondition: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<&'a str>,
    pub case_level: &'static str,
    pub case_type: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_suggestions: Option<&'a str>,
    pub execution_time_minutes: u32,
}

impl<'a> From<&'a TestCaseDraft> for TestCaseCreateBody<'a> {
    fn from(draft: &'a TestCaseDraft) -> Self {
        Self {
            session_id: &draft.session_id,
            title: &draft.title,
            group_name: draft.group_name.as_deref(),
            maintainer: draft.maintainer.as_deref(),
            precondition: draft.precondition.as_deref(),
            step_description: draft.step_description.as_deref(),
            expected_result: draft.expected_result.as_deref(),
            case_level: draft.case_level.as_str(),
            case_type: draft.case_type.as_str(),
            status: draft.status.as_str(),
            test_suggestions: draft.test_suggestions.as_deref(),
            execution_time_minutes: draft.execution_time_minutes,
        }
    }
}

/// Body of `PUT /api/test-cases/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TestCaseUpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precondition: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_level: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_suggestions: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_minutes: Option<u32>,
}

impl<'a> From<&'a TestCasePatch> for TestCaseUpdateBody<'a> {
    fn from(patch: &'a TestCasePatch) -> Self {
        Self {
            title: patch.title.as_deref(),
            group_name: patch.group_name.as_deref(),
            maintainer: patch.maintainer.as_deref(),
            precondition: patch.precondition.as_deref(),
            step_description: patch.step_description.as_deref(),
            expected_result: patch.expected_result.as_deref(),
            case_level: patch.case_level.map(|v| v.as_str()),
            case_type: patch.case_type.map(|v| v.as_str()),
            status: patch.status.map(|v| v.as_str()),
            test_suggestions: patch.test_suggestions.as_deref(),
            execution_time_minutes: patch.execution_time_minutes,
        }
    }
}

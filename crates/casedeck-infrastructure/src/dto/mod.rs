//! Wire DTOs of the remote API.
//!
//! Every optional wire field is an `Option` here. Conversion into domain
//! values is the one place where defaults are resolved.

mod ai_config;
mod document;
mod session;
mod test_case;

pub use ai_config::AiConfigurationDto;
pub use document::{AnalyzeRequestDto, AnalyzeResponseDto, UploadResponseDto};
pub use session::{SessionDto, SessionTitleBody};
pub(crate) use session::sessions_into_domain;
pub use test_case::{TestCaseCreateBody, TestCaseDto, TestCaseUpdateBody};

use casedeck_core::error::{CasedeckError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Parses a server timestamp.
///
/// Accepts RFC 3339 and the offset-less ISO form the server emits for
/// database timestamps (interpreted as UTC).
pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(CasedeckError::Serialization {
        format: "JSON".to_string(),
        message: format!("invalid timestamp in '{field}': {raw}"),
    })
}

/// Treats empty and whitespace-only strings as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

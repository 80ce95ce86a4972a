//! AI configuration domain model.

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{CasedeckError, Result};

/// Connection settings for the AI provider that generates test cases.
///
/// At most one configuration per user is meant to be active; that rule is
/// enforced by the remote store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfiguration {
    pub id: String,
    pub user_id: String,
    pub provider: String,
    pub api_endpoint: String,
    pub model_name: String,
    /// As returned by the remote store, usually masked
    pub api_key: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl AiConfiguration {
    /// Returns the key with everything but the last four characters masked.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

/// Fields for creating an AI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfigurationDraft {
    pub provider: String,
    pub api_endpoint: String,
    pub model_name: String,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub is_active: bool,
}

impl AiConfigurationDraft {
    /// Checks required fields and the endpoint URL.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("provider", &self.provider),
            ("model_name", &self.model_name),
            ("api_key", &self.api_key),
            ("api_endpoint", &self.api_endpoint),
        ] {
            if value.trim().is_empty() {
                return Err(CasedeckError::validation(field, format!("{field} is required")));
            }
        }

        let url = Url::parse(self.api_endpoint.trim()).map_err(|e| {
            CasedeckError::validation("api_endpoint", format!("not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CasedeckError::validation(
                "api_endpoint",
                format!("unsupported URL scheme '{}'", url.scheme()),
            ));
        }
        if url.host_str().is_none() {
            return Err(CasedeckError::validation("api_endpoint", "URL has no host"));
        }
        Ok(())
    }
}

use casedeck_core::ai_config::AiConfiguration;
use casedeck_core::error::Result;
use serde::Deserialize;

use super::parse_timestamp;

/// AI configuration as returned by `/api/ai-config`.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfigurationDto {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub provider: String,
    pub api_endpoint: String,
    pub model_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: String,
}

fn default_active() -> bool {
    true
}

impl AiConfigurationDto {
    pub fn into_domain(self) -> Result<AiConfiguration> {
        Ok(AiConfiguration {
            created_at: parse_timestamp("created_at", &self.created_at)?,
            id: self.id,
            user_id: self.user_id.unwrap_or_else(|| "default".to_string()),
            provider: self.provider,
            api_endpoint: self.api_endpoint,
            model_name: self.model_name,
            api_key: self.api_key,
            is_active: self.is_active,
        })
    }
}

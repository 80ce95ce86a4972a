//! Client configuration.
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. `~/.config/casedeck/config.toml` (or an explicit path)
//! 3. environment variables (`CASEDECK_API_URL`, `CASEDECK_TIMEOUT_SECS`, `CASEDECK_STATE_FILE`)

use casedeck_core::error::{CasedeckError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths::CasedeckPaths;

pub const ENV_API_URL: &str = "CASEDECK_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CASEDECK_TIMEOUT_SECS";
pub const ENV_STATE_FILE: &str = "CASEDECK_STATE_FILE";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings of the client side of casedeck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the remote API (without the `/api` prefix)
    pub api_base_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Where the active session id is persisted; platform default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    /// Directory exported spreadsheets are written to; current dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            state_file: None,
            export_dir: None,
        }
    }
}

impl ClientConfig {
    /// Loads the config from the default location and applies env overrides.
    pub fn load() -> Result<Self> {
        let path = CasedeckPaths::config_file()?;
        Self::load_from(&path)
    }

    /// Loads the config from `path` (missing file → defaults) and applies env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        tracing::debug!(
            "[ClientConfig] Loaded config: api_base_url={}, timeout={}s",
            config.api_base_url,
            config.request_timeout_secs
        );
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("[ClientConfig] No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(&content)?)
    }

    /// Applies overrides from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CasedeckError::config(format!("{ENV_TIMEOUT_SECS} must be a number, got '{raw}'"))
            })?;
        }
        if let Some(path) = lookup(ENV_STATE_FILE).filter(|v| !v.trim().is_empty()) {
            self.state_file = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Resolved location of the state file.
    pub fn state_file_path(&self) -> Result<PathBuf> {
        match &self.state_file {
            Some(path) => Ok(path.clone()),
            None => Ok(CasedeckPaths::state_file()?),
        }
    }

    /// Resolved export directory.
    pub fn export_dir_path(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClientConfig::read_file(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_file_values_and_partial_tables() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://qa.example.com/\"\nexport_dir = \"/tmp/out\"\n",
        )
        .unwrap();

        let config = ClientConfig::read_file(&path).unwrap();
        assert_eq!(config.base_url(), "https://qa.example.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.export_dir_path(), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://10.0.0.2:9000"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_STATE_FILE, "/tmp/state.toml"),
        ]);
        let mut config = ClientConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_base_url, "http://10.0.0.2:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.state_file_path().unwrap(),
            PathBuf::from("/tmp/state.toml")
        );
    }

    #[test]
    fn test_bad_timeout_is_config_error() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_overrides(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, CasedeckError::Config(_)));
    }
}

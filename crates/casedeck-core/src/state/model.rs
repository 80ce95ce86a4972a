//! Application state domain models.
//!
//! Contains local state that survives restarts of the client.

use serde::{Deserialize, Serialize};

/// Client state that persists across restarts.
///
/// # File Location
///
/// - Linux: `~/.config/casedeck/state.toml`
/// - macOS: `~/Library/Application Support/casedeck/state.toml`
/// - Windows: `%APPDATA%\casedeck\state.toml`
///
/// Holds a single scalar: the id of the last active session. There is no
/// selection history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// ID of the last active session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_session_id: Option<String>,
}

impl AppState {
    /// Creates a new AppState with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let state = AppState::new();
        assert!(state.active_session_id.is_none());
    }

    #[test]
    fn test_toml_roundtrip_omits_empty_key() {
        let empty = toml::to_string(&AppState::new()).unwrap();
        assert!(empty.trim().is_empty());

        let state = AppState {
            active_session_id: Some("s1".to_string()),
        };
        let text = toml::to_string(&state).unwrap();
        assert_eq!(text.trim(), r#"activeSessionId = "s1""#);
        let parsed: AppState = toml::from_str(&text).unwrap();
        assert_eq!(parsed, state);
    }
}

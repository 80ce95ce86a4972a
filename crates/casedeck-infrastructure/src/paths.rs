//! Unified path management for casedeck files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/casedeck/          # Config directory (platform default)
//! ├── config.toml              # Client configuration
//! └── state.toml               # Last active session id
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for casedeck_core::CasedeckError {
    fn from(err: PathError) -> Self {
        casedeck_core::CasedeckError::config(err.to_string())
    }
}

const APP_DIR: &str = "casedeck";

/// Path resolution for casedeck.
pub struct CasedeckPaths;

impl CasedeckPaths {
    /// Returns the casedeck configuration directory (e.g. `~/.config/casedeck/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the client configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted client state.
    pub fn state_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("state.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_in_config_dir() {
        if let Ok(dir) = CasedeckPaths::config_dir() {
            assert!(dir.ends_with(APP_DIR));
            assert_eq!(CasedeckPaths::config_file().unwrap(), dir.join("config.toml"));
            assert_eq!(CasedeckPaths::state_file().unwrap(), dir.join("state.toml"));
        }
    }
}

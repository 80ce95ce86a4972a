//! Error types for casedeck.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire casedeck workspace.
///
/// The variants follow how a failure is surfaced to the user:
/// - `Validation` is raised before any remote call and blocks submission
/// - `Remote` is a transient failure of a remote call; caches stay untouched
/// - `StaleReference` is resolved silently by clearing the dangling pointer
/// - `EmptyExport` aborts an export that has no rows
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum CasedeckError {
    /// Input rejected before any network round-trip
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Remote call failed (network or server error)
    #[error("Remote call failed: {operation}{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Remote {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// A stored reference points at an entity that no longer exists
    #[error("Stale reference: {entity_type} '{id}'")]
    StaleReference {
        entity_type: &'static str,
        id: String,
    },

    /// Export requested for an empty view
    #[error("Nothing to export")]
    EmptyExport,

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The same action is already in flight
    #[error("Operation already in progress: {0}")]
    Busy(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", "XLSX"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CasedeckError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a Remote error without an HTTP status
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Remote error carrying the HTTP status code
    pub fn remote_status(
        operation: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Remote {
            operation: operation.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a StaleReference error
    pub fn stale_reference(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::StaleReference {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a Remote error
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Check if this is a Busy error
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }

    /// Check if this is an EmptyExport error
    pub fn is_empty_export(&self) -> bool {
        matches!(self, Self::EmptyExport)
    }

    /// Check if this error means the referenced entity is gone.
    ///
    /// Returns true for `NotFound`, `StaleReference`, and `Remote` errors
    /// that carry HTTP 404.
    pub fn is_not_found_or_stale(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::StaleReference { .. } => true,
            Self::Remote { status, .. } => *status == Some(404),
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CasedeckError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CasedeckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CasedeckError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CasedeckError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for CasedeckError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Serialization {
            format: "XLSX".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for CasedeckError {
    fn from(err: reqwest::Error) -> Self {
        let operation = err
            .url()
            .map(|url| url.path().to_string())
            .unwrap_or_else(|| "request".to_string());
        Self::Remote {
            operation,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, CasedeckError>`.
pub type Result<T> = std::result::Result<T, CasedeckError>;

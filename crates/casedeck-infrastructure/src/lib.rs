//! Infrastructure layer for casedeck.
//!
//! Concrete implementations of the repository traits from `casedeck-core`:
//! the REST client, the on-disk active-session state, configuration
//! loading and the XLSX writer.

pub mod config;
pub mod dto;
pub mod http;
pub mod paths;
pub mod spreadsheet;
pub mod state_repository;
pub mod storage;

pub use config::ClientConfig;
pub use http::HttpApiClient;
pub use paths::CasedeckPaths;
pub use state_repository::{FileStateRepository, MemoryStateRepository};

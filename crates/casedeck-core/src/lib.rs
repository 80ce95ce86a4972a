//! Domain layer for casedeck.
//!
//! Models, repository traits for every remote collaborator, input validation
//! and the test-case filter. Nothing in this crate performs I/O.

pub mod ai_config;
pub mod document;
pub mod error;
pub mod filter;
pub mod notification;
pub mod session;
pub mod state;
pub mod test_case;

// Re-export common error type
pub use error::{CasedeckError, Result};
pub use filter::FilterCriteria;
pub use notification::{Notification, NotificationLevel};

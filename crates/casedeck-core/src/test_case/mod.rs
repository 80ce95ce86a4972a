//! Test case domain module.
//!
//! - `model`: `TestCase`, its enumerations, and the create/update payloads
//! - `repository`: Repository trait for the remote test-case collection

mod model;
mod repository;

pub use model::{
    CaseLevel, CaseStatus, CaseType, DEFAULT_EXECUTION_MINUTES, MAX_EXECUTION_MINUTES,
    MAX_TITLE_LEN, MIN_EXECUTION_MINUTES, TestCase, TestCaseDraft, TestCasePatch,
};
pub use repository::TestCaseRepository;

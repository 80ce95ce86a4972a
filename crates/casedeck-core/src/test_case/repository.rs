//! Test case repository trait.

use super::model::{TestCase, TestCaseDraft, TestCasePatch};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the remote test-case collection.
#[async_trait]
pub trait TestCaseRepository: Send + Sync {
    /// Lists the test cases of one session, in the order the remote store returns them.
    async fn list(&self, session_id: &str) -> Result<Vec<TestCase>>;

    /// Creates a test case and returns the stored record.
    async fn create(&self, draft: &TestCaseDraft) -> Result<TestCase>;

    /// Applies a partial update and returns the stored record.
    async fn update(&self, case_id: &str, patch: &TestCasePatch) -> Result<TestCase>;

    /// Deletes a test case.
    async fn delete(&self, case_id: &str) -> Result<()>;
}

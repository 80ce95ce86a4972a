//! AI configuration repository trait.

use super::model::{AiConfiguration, AiConfigurationDraft};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the remote AI configuration collection.
#[async_trait]
pub trait AiConfigurationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<AiConfiguration>>;

    async fn create(&self, draft: &AiConfigurationDraft) -> Result<AiConfiguration>;
}

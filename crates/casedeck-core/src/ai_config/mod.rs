//! AI provider configuration domain module.

mod model;
mod repository;

pub use model::{AiConfiguration, AiConfigurationDraft};
pub use repository::AiConfigurationRepository;

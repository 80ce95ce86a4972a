pub mod ai_config;
pub mod case;
pub mod document;
pub mod export;
pub mod session;

//! Durable local state.

pub mod model;
pub mod repository;

pub use model::AppState;
pub use repository::ActiveSessionRepository;

//! Session domain module.
//!
//! A session groups one document-analysis pass and the test cases it produced.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `repository`: Repository trait for the remote session collection

mod model;
mod repository;

pub use model::{MAX_SESSION_TITLE_LEN, Session, validate_session_title};
pub use repository::SessionRepository;

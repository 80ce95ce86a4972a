//! Session lifecycle: the active-session pointer, the known-sessions list
//! and restoration of the last selection across restarts.

mod store;

pub use store::{LoadPhase, SessionStore, default_session_title};

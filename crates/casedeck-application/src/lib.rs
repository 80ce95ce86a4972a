//! Application layer for casedeck.
//!
//! Use cases coordinating the domain and infrastructure layers: the
//! mutation cache, the session store, document upload/analysis and the
//! spreadsheet export of the filtered view.

pub mod cache;
pub mod document;
pub mod events;
pub mod export;
pub mod session;

pub use cache::{CachePartition, MutationCache, RemoteCollections};
pub use document::DocumentService;
pub use events::{Notifier, StoreEvent};
pub use export::{ExportOutcome, ExportedFile, SpreadsheetExporter};
pub use session::{LoadPhase, SessionStore};

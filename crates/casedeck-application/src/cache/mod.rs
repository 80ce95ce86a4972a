//! Mutation cache: local copies of remote collections and the rules that
//! keep them consistent after every write.
//!
//! - `partition`: cache partitions and the mutation → invalidation table
//! - `busy`: per-kind in-flight guards
//! - `store`: the cache itself

mod busy;
mod partition;
mod store;

pub use busy::{BusyGuard, BusySlots};
pub use partition::{CachePartition, Mutation, MutationKind};
pub use store::{MutationCache, RemoteCollections};

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use casedeck_core::error::{CasedeckError, Result};

use super::partition::MutationKind;

/// Advisory in-flight flags, one per mutation kind.
///
/// Mirrors a button that disables itself while its action runs. It
/// serializes repeats from the same caller; it is not a lock against
/// independent writers.
#[derive(Clone, Debug, Default)]
pub struct BusySlots {
    in_flight: Arc<Mutex<HashSet<MutationKind>>>,
}

impl BusySlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<MutationKind>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks `kind` busy, or fails with `Busy` if it already is.
    pub fn acquire(&self, kind: MutationKind) -> Result<BusyGuard> {
        if !self.lock().insert(kind) {
            tracing::debug!("[BusySlots] '{}' already in flight", kind);
            return Err(CasedeckError::Busy(kind.to_string()));
        }
        Ok(BusyGuard {
            slots: self.clone(),
            kind,
        })
    }

    pub fn is_busy(&self, kind: MutationKind) -> bool {
        self.lock().contains(&kind)
    }
}

/// Releases its slot when dropped, on success and failure alike.
#[derive(Debug)]
pub struct BusyGuard {
    slots: BusySlots,
    kind: MutationKind,
}

impl BusyGuard {
    pub fn kind(&self) -> MutationKind {
        self.kind
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.slots.lock().remove(&self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected_until_release() {
        let slots = BusySlots::new();
        let guard = slots.acquire(MutationKind::CreateSession).unwrap();
        assert!(slots.is_busy(MutationKind::CreateSession));
        assert!(
            slots
                .acquire(MutationKind::CreateSession)
                .unwrap_err()
                .is_busy()
        );

        drop(guard);
        assert!(!slots.is_busy(MutationKind::CreateSession));
        assert!(slots.acquire(MutationKind::CreateSession).is_ok());
    }

    #[test]
    fn test_kinds_are_independent() {
        let slots = BusySlots::new();
        let _create = slots.acquire(MutationKind::CreateTestCase).unwrap();
        let update = slots.acquire(MutationKind::UpdateTestCase).unwrap();
        assert_eq!(update.kind(), MutationKind::UpdateTestCase);
    }
}

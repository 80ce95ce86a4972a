//! Observer channel between the state layer and its views.

use std::sync::{Arc, Mutex, MutexGuard};

use casedeck_core::notification::Notification;
use casedeck_core::session::Session;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::session::LoadPhase;

/// Events published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A transient user-visible message.
    Notification(Notification),
    /// The active session changed (or was cleared).
    ActiveSessionChanged(Option<Session>),
    /// The session store moved to a new load phase.
    PhaseChanged(LoadPhase),
}

/// Fan-out publisher of [`StoreEvent`]s.
///
/// Cheap to clone; every clone publishes to the same subscribers.
#[derive(Clone, Default)]
pub struct Notifier {
    subscribers: Arc<Mutex<Vec<UnboundedSender<StoreEvent>>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UnboundedSender<StoreEvent>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> UnboundedReceiver<StoreEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        rx
    }

    /// Publishes an event, dropping subscribers whose receiver is gone.
    pub fn emit(&self, event: StoreEvent) {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn notify(&self, notification: Notification) {
        tracing::debug!("[Notifier] {}", notification);
        self.emit(StoreEvent::Notification(notification));
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Drops every sender so receivers observe the end of the stream.
    pub fn close_all(&self) {
        self.lock().clear();
    }
}

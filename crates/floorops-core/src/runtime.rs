use crate::model::{ConnectionState, ViewId};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Process-wide state shared between the presentation loop and the
/// background tasks.
///
/// Each field has one writer: `connection` is written by the poll task,
/// `active_view` by the presentation layer, and the shutdown signal by
/// whichever side ends the session first.
#[derive(Debug)]
pub struct RuntimeState {
    connection: AtomicU8,
    active_view: AtomicU8,
    shutdown: watch::Sender<bool>,
}

impl Default for RuntimeState {
    fn default() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            connection: AtomicU8::new(ConnectionState::Offline.as_u8()),
            active_view: AtomicU8::new(ViewId::Dashboard.index() as u8),
            shutdown,
        }
    }
}

impl RuntimeState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_running(&self) -> bool {
        !*self.shutdown.borrow()
    }

    pub fn connection(&self) -> ConnectionState {
        ConnectionState::from_u8(self.connection.load(Ordering::Acquire))
    }

    /// Returns the previous state so callers can log edges.
    pub(crate) fn set_connection(&self, state: ConnectionState) -> ConnectionState {
        ConnectionState::from_u8(self.connection.swap(state.as_u8(), Ordering::AcqRel))
    }

    pub fn active_view(&self) -> ViewId {
        ViewId::from_index(usize::from(self.active_view.load(Ordering::Acquire)))
            .unwrap_or_default()
    }

    /// Returns the previously active view.
    pub fn set_active_view(&self, view: ViewId) -> ViewId {
        let previous = self.active_view.swap(view.index() as u8, Ordering::AcqRel);
        ViewId::from_index(usize::from(previous)).unwrap_or_default()
    }

    /// Idempotent. Loops finish their current cycle and start no new one.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

use super::SubscriptionRegistry;
use super::connection::ConnectionState;
use crate::infrastructure::{ReconnectPolicy, TaskManager};
use crate::types::Envelope;
use tokio::sync::watch;

/// Consolidated mutable state for MonitorClient.
/// Using a single struct keeps lock ordering trivial.
pub struct ClientState {
    /// Task ids the caller wants events for, replayed on reconnect
    pub subscriptions: SubscriptionRegistry,

    /// Bounded fixed-delay retry budget
    pub reconnect: ReconnectPolicy,

    /// Background tasks for the current transport generation
    pub task_manager: TaskManager,

    /// Whether the disconnect was caller-initiated (prevents auto-reconnect)
    pub was_manual_disconnect: bool,

    /// Ceiling exhaustion is reported once per run of automatic retries
    pub exhaustion_reported: bool,

    /// Most recently received, successfully parsed envelope
    pub last_message: Option<Envelope>,

    /// Sender for state change notifications
    pub state_change_tx: Option<watch::Sender<(ConnectionState, bool)>>,
}

impl ClientState {
    pub fn new(reconnect: ReconnectPolicy) -> Self {
        Self {
            subscriptions: SubscriptionRegistry::new(),
            reconnect,
            task_manager: TaskManager::new(),
            was_manual_disconnect: false,
            exhaustion_reported: false,
            last_message: None,
            state_change_tx: None,
        }
    }

    /// Notify state change watchers
    pub fn notify_state_change(&self, state: ConnectionState, manual: bool) {
        if let Some(tx) = &self.state_change_tx {
            if tx.send((state, manual)).is_err() {
                tracing::debug!(
                    "State change watcher disconnected, could not notify state: {}",
                    state
                );
            }
        }
    }
}

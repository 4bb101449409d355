use super::{ClientState, ConnectionManager, ConnectionState, MonitorClient};
use crate::infrastructure::ReconnectPolicy;
use crate::messaging::MonitorHandlers;
use crate::types::{MonitorError, RECONNECT_CEILING, RECONNECT_DELAY, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Tuning knobs for the monitor client. Unset fields fall back to the
/// defaults in [`crate::types::constants`].
#[derive(Debug, Clone, Default)]
pub struct MonitorClientOptions {
    /// Keepalive ping interval in milliseconds (default 30000)
    pub ping_interval: Option<u64>,
    /// Delay between automatic reconnect attempts in milliseconds (default 3000)
    pub reconnect_delay: Option<u64>,
    /// Maximum consecutive automatic reconnect attempts (default 5)
    pub reconnect_ceiling: Option<u32>,
}

/// Builder for MonitorClient that handles initialization
pub struct MonitorClientBuilder {
    endpoint: String,
    options: MonitorClientOptions,
    handlers: MonitorHandlers,
}

impl MonitorClientBuilder {
    /// Create a new builder.
    ///
    /// The endpoint must be non-empty; full scheme validation happens in
    /// [`MonitorClient::connect`], which short-circuits to the `error` state
    /// for anything that is not a real-time-capable URL.
    pub fn new(
        endpoint: impl Into<String>,
        options: MonitorClientOptions,
        handlers: MonitorHandlers,
    ) -> Result<Self> {
        let endpoint = endpoint.into();

        if endpoint.trim().is_empty() {
            return Err(MonitorError::Endpoint(
                "endpoint must not be empty".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            options,
            handlers,
        })
    }

    /// Build the client and spawn the reconnection watcher
    pub fn build(self) -> MonitorClient {
        let delay = Duration::from_millis(self.options.reconnect_delay.unwrap_or(RECONNECT_DELAY));
        let ceiling = self.options.reconnect_ceiling.unwrap_or(RECONNECT_CEILING);

        let mut client_state = ClientState::new(ReconnectPolicy::new(delay, ceiling));

        // State watcher channel drives automatic reconnection
        let (state_tx, state_rx) = watch::channel((ConnectionState::Disconnected, false));
        client_state.state_change_tx = Some(state_tx);

        let client = MonitorClient {
            endpoint: self.endpoint,
            options: self.options,
            handlers: Arc::new(self.handlers),
            connection: Arc::new(ConnectionManager::new()),
            state: Arc::new(RwLock::new(client_state)),
        };

        // Reconnection watcher: reacts to non-manual disconnects for the
        // client's whole life, ending when the last clone is dropped.
        let client_for_watcher = client.clone();
        tokio::spawn(async move {
            let mut rx = state_rx;

            while rx.changed().await.is_ok() {
                let (state, was_manual) = *rx.borrow_and_update();

                if matches!(state, ConnectionState::Disconnected) && !was_manual {
                    tracing::info!("State watcher detected disconnect, attempting reconnection...");
                    client_for_watcher.try_reconnect().await;
                }
            }
            tracing::debug!("Reconnection watcher task finished");
        });

        client
    }
}

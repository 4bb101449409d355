use crate::client::ConnectionManager;
use crate::messaging::{ErrorDetail, ErrorKind, MonitorHandlers};
use crate::types::Envelope;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// Emits a keepalive `ping` envelope at a fixed interval while connected.
///
/// The ping exists primarily to keep intermediaries (proxies, load balancers)
/// from closing an idle connection. A failed send is reported as a transport
/// error but the state transition itself is driven by the read loop observing
/// the closure, so a single failure is never double-counted.
pub struct HeartbeatMonitor {
    interval: Duration,
    endpoint: String,
    connection: Weak<ConnectionManager>,
    handlers: Arc<MonitorHandlers>,
}

impl HeartbeatMonitor {
    pub fn new(
        interval: Duration,
        endpoint: String,
        connection: Weak<ConnectionManager>,
        handlers: Arc<MonitorHandlers>,
    ) -> Self {
        Self {
            interval,
            endpoint,
            connection,
            handlers,
        }
    }

    /// Spawns the keepalive task for the current transport generation.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval_timer = time::interval(self.interval);
            interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            // interval() fires immediately; skip the initial tick so the
            // first ping lands one full interval after connect.
            interval_timer.tick().await;

            loop {
                interval_timer.tick().await;

                let connection = match self.connection.upgrade() {
                    Some(connection) => connection,
                    None => break,
                };

                // Must never run while disconnected; the connection manager
                // also aborts this task on teardown.
                if !connection.is_connected().await {
                    break;
                }

                match connection.send_envelope(&Envelope::ping()).await {
                    Ok(()) => tracing::debug!("Sent keepalive ping"),
                    Err(e) => {
                        tracing::warn!("Keepalive ping failed: {}", e);
                        let detail = ErrorDetail::new(
                            ErrorKind::Transport,
                            &self.endpoint,
                            connection.state().await,
                            format!("keepalive ping failed: {}", e),
                        );
                        self.handlers.emit_error(&detail);
                        break;
                    }
                }
            }
            tracing::debug!("Heartbeat task finished");
        })
    }
}

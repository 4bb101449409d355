use super::{ClientState, ConnectionManager, ConnectionState, MonitorClientBuilder};
use crate::client::builder::MonitorClientOptions;
use crate::infrastructure::HeartbeatMonitor;
use crate::messaging::{ErrorDetail, ErrorKind, MessageRouter, MonitorHandlers};
use crate::types::{ACCEPTED_SCHEMES, Envelope, MonitorError, PING_INTERVAL, Result};
use crate::websocket::WebSocketFactory;
use futures::stream::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

/// The public facade for the real-time task-monitoring channel.
///
/// `MonitorClient` maintains one long-lived WebSocket connection to the
/// scraper's event stream, multiplexes server-pushed events to the typed
/// handlers supplied at construction, and recovers from transient network
/// failure without losing subscription state. Dropped connections are retried
/// at a fixed delay up to a configurable ceiling; caller-initiated
/// disconnects are never retried.
///
/// # Example
///
/// ```no_run
/// use scrape_monitor_rs::{MonitorClient, MonitorClientOptions, MonitorHandlers};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MonitorClient::new(
///     "wss://scraper.example.com/ws/monitor",
///     MonitorClientOptions::default(),
///     MonitorHandlers::default(),
/// )?;
///
/// client.connect().await?;
/// client.subscribe_to_task("task-42").await;
/// // ... events flow to the handlers ...
/// client.disconnect().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MonitorClient {
    pub(crate) endpoint: String,
    pub(crate) options: MonitorClientOptions,

    // Handler slots, immutable for the client's life
    pub(crate) handlers: Arc<MonitorHandlers>,

    // Exclusive owner of the transport write handle
    pub(crate) connection: Arc<ConnectionManager>,

    // Consolidated mutable state
    pub(crate) state: Arc<RwLock<ClientState>>,
}

impl MonitorClient {
    /// Creates a new client without opening a connection.
    ///
    /// Handlers are registered here, once, and cannot be rewired afterwards.
    /// Call [`connect()`](Self::connect) to establish the connection.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Endpoint`] if the endpoint is empty. A
    /// non-empty but malformed endpoint is only rejected by `connect()`,
    /// which moves the client to the `error` state without dialing.
    pub fn new(
        endpoint: impl Into<String>,
        options: MonitorClientOptions,
        handlers: MonitorHandlers,
    ) -> Result<Self> {
        MonitorClientBuilder::new(endpoint, options, handlers).map(|builder| builder.build())
    }

    /// The endpoint this client targets.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current connection state, for UI binding.
    pub async fn state(&self) -> ConnectionState {
        self.connection.state().await
    }

    /// Whether the connection is currently open.
    pub async fn is_connected(&self) -> bool {
        self.connection.is_connected().await
    }

    /// The most recently received, successfully parsed envelope.
    pub async fn last_message(&self) -> Option<Envelope> {
        self.state.read().await.last_message.clone()
    }

    /// Set connection state and notify the reconnection watcher
    async fn set_state(&self, next: ConnectionState) {
        self.connection.transition(next).await;

        let state = self.state.read().await;
        state.notify_state_change(next, state.was_manual_disconnect);
    }

    /// Establishes the connection.
    ///
    /// Idempotent: calling while already `connecting` or `connected` is a
    /// no-op, so duplicate transports cannot be created. An explicit call
    /// also reopens the automatic-retry budget after ceiling exhaustion.
    pub async fn connect(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.was_manual_disconnect = false;
            state.reconnect.reset();
            state.exhaustion_reported = false;
        }
        self.establish().await
    }

    /// Gracefully disconnects and suppresses automatic reconnection.
    ///
    /// Cancels the keepalive and any pending reconnect, closes the transport
    /// if one is open, and leaves the client `disconnected` until an explicit
    /// [`connect()`](Self::connect).
    pub async fn disconnect(&self) {
        let was_connected = self.connection.is_connected().await;
        tracing::info!("Disconnecting from {}", self.endpoint);

        {
            let mut state = self.state.write().await;
            state.was_manual_disconnect = true;
            state.task_manager.abort_all();
        }

        self.connection.close().await;

        // Watchers see the manual flag and take no action
        {
            let state = self.state.read().await;
            state.notify_state_change(ConnectionState::Disconnected, true);
        }

        if was_connected {
            self.handlers.emit_disconnect();
        }
    }

    /// Sends one caller-constructed envelope.
    ///
    /// Returns whether the frame was actually transmitted: `false` when not
    /// connected or when the write fails. Never queues and never panics.
    pub async fn send(&self, envelope: Envelope) -> bool {
        if !self.connection.is_connected().await {
            tracing::debug!("Dropping outbound {} frame: not connected", envelope.kind);
            return false;
        }

        match self.connection.send_envelope(&envelope).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to send {} frame: {}", envelope.kind, e);
                let detail = ErrorDetail::new(
                    ErrorKind::Transport,
                    &self.endpoint,
                    self.connection.state().await,
                    format!("send failed: {}", e),
                );
                self.handlers.emit_error(&detail);
                false
            }
        }
    }

    /// Sends an immediate keepalive ping. Returns whether it was transmitted.
    pub async fn ping(&self) -> bool {
        self.send(Envelope::ping()).await
    }

    /// Requests events for a task.
    ///
    /// Idempotent set mutation; the subscription survives reconnects until
    /// explicitly removed. If currently connected the `subscribe_task` frame
    /// is emitted immediately, otherwise emission is deferred to the replay
    /// that follows the next successful open.
    pub async fn subscribe_to_task(&self, task_id: impl Into<String>) {
        let task_id = task_id.into();

        let newly_added = {
            let mut state = self.state.write().await;
            state.subscriptions.add(task_id.clone())
        };
        if !newly_added {
            tracing::debug!("Already subscribed to task {}", task_id);
            return;
        }

        if self.connection.is_connected().await {
            self.send(Envelope::subscribe(task_id)).await;
        } else {
            tracing::debug!(
                "Not connected, deferring subscribe_task for {} to replay",
                task_id
            );
        }
    }

    /// Stops requesting events for a task and removes it from replay.
    pub async fn unsubscribe_from_task(&self, task_id: &str) {
        let was_present = {
            let mut state = self.state.write().await;
            state.subscriptions.remove(task_id)
        };
        if !was_present {
            return;
        }

        if self.connection.is_connected().await {
            self.send(Envelope::unsubscribe(task_id)).await;
        }
    }

    /// Number of active task subscriptions.
    pub async fn subscription_count(&self) -> usize {
        self.state.read().await.subscriptions.len()
    }

    fn validate_endpoint(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint)?;
        if !ACCEPTED_SCHEMES.contains(&url.scheme()) {
            return Err(MonitorError::Endpoint(format!(
                "scheme '{}' is not real-time capable",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// Opens a new transport without touching the retry budget.
    /// Shared by `connect()` and the reconnection watcher.
    pub(crate) async fn establish(&self) -> Result<()> {
        {
            let state = self.connection.state().await;
            if state == ConnectionState::Connected || state == ConnectionState::Connecting {
                return Ok(());
            }
        }

        // Configuration errors short-circuit to `error` without dialing
        let url = match self.validate_endpoint() {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Invalid endpoint '{}': {}", self.endpoint, e);
                self.set_state(ConnectionState::Error).await;
                let detail = ErrorDetail::new(
                    ErrorKind::Configuration,
                    &self.endpoint,
                    ConnectionState::Error,
                    e.to_string(),
                );
                self.handlers.emit_error(&detail);
                return Err(e);
            }
        };

        self.set_state(ConnectionState::Connecting).await;
        tracing::info!("Connecting to {}", self.endpoint);

        // Tear down whatever is left of a previous transport generation
        {
            let mut state = self.state.write().await;
            state.task_manager.abort_all();
        }
        self.connection.clear_writer().await;

        let ws_stream = match WebSocketFactory::create(url.as_str()).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("Failed to open transport: {}", e);
                let detail = ErrorDetail::new(
                    ErrorKind::Transport,
                    &self.endpoint,
                    ConnectionState::Connecting,
                    e.to_string(),
                );
                self.handlers.emit_error(&detail);
                self.set_state(ConnectionState::Disconnected).await;
                return Err(e);
            }
        };

        let (write_half, mut read_half) = ws_stream.split();
        self.connection.set_writer(write_half).await;

        // Connected must be observable before the read loop exists: a server
        // that closes right after the handshake would otherwise drain the
        // close while the state still reads `connecting`, skip the final
        // transition below, and leave the client stranded in `connected`
        self.set_state(ConnectionState::Connected).await;

        let router = MessageRouter::new(
            self.endpoint.clone(),
            Arc::clone(&self.handlers),
            Arc::clone(&self.connection),
            Arc::clone(&self.state),
        );

        // Read loop: dispatch inbound frames in delivery order; any closure
        // or read error funnels into the single disconnected transition below
        let self_cloned = self.clone();
        {
            let mut state = self.state.write().await;
            state.task_manager.spawn("read-loop", async move {
                use tokio_tungstenite::tungstenite::Message;

                while let Some(msg_result) = read_half.next().await {
                    match msg_result {
                        Ok(Message::Text(text)) => {
                            router.dispatch(&text).await;
                        }
                        Ok(Message::Close(frame)) => {
                            if let Some(close_frame) = frame {
                                tracing::warn!(
                                    "Server closed connection: code={:?}, reason='{}'",
                                    close_frame.code,
                                    close_frame.reason
                                );
                            } else {
                                tracing::warn!("Server closed connection without close frame");
                            }
                            break;
                        }
                        Ok(Message::Ping(data)) => {
                            tracing::debug!("Received transport ping ({} bytes)", data.len());
                        }
                        Ok(Message::Pong(data)) => {
                            tracing::debug!("Received transport pong ({} bytes)", data.len());
                        }
                        Ok(Message::Binary(data)) => {
                            tracing::warn!(
                                "Received unexpected binary frame ({} bytes)",
                                data.len()
                            );
                        }
                        Ok(Message::Frame(_)) => {
                            tracing::debug!("Received raw frame (internal)");
                        }
                        Err(e) => {
                            // Reported, but the closure below drives the
                            // state transition so one failure is never
                            // counted twice
                            tracing::warn!("WebSocket read error: {}", e);
                            let detail = ErrorDetail::new(
                                ErrorKind::Transport,
                                &self_cloned.endpoint,
                                self_cloned.connection.state().await,
                                format!("read error: {}", e),
                            );
                            self_cloned.handlers.emit_error(&detail);
                            break;
                        }
                    }
                }

                if self_cloned.connection.is_connected().await {
                    tracing::info!("Transport closed, marking disconnected");
                    self_cloned
                        .set_state(ConnectionState::Disconnected)
                        .await;
                    self_cloned.handlers.emit_disconnect();
                }
                tracing::debug!("Read task finished");
            });
        }

        // Successful open: retry budget back to zero, keepalive on, replay
        {
            let mut state = self.state.write().await;
            state.reconnect.reset();
            state.exhaustion_reported = false;

            let interval =
                Duration::from_millis(self.options.ping_interval.unwrap_or(PING_INTERVAL));
            let heartbeat = HeartbeatMonitor::new(
                interval,
                self.endpoint.clone(),
                Arc::downgrade(&self.connection),
                Arc::clone(&self.handlers),
            );
            state.task_manager.track("heartbeat", heartbeat.spawn());
        }

        self.replay_subscriptions().await;
        self.handlers.emit_connect();

        tracing::info!("Connected to {}", self.endpoint);
        Ok(())
    }

    /// Re-emits one `subscribe_task` frame per active subscription, in the
    /// order they were first added. Best-effort: subscriptions are idempotent
    /// on the server, so individual failures are logged and skipped.
    async fn replay_subscriptions(&self) {
        let envelopes = {
            let state = self.state.read().await;
            state.subscriptions.replay_envelopes()
        };

        for envelope in envelopes {
            if let Err(e) = self.connection.send_envelope(&envelope).await {
                tracing::warn!(
                    "Failed to replay subscription for {:?}: {}",
                    envelope.task_id,
                    e
                );
            }
        }
    }

    /// Bounded reconnect loop run by the state watcher after a non-manual
    /// disconnect. Stops on success, on manual disconnect, or when the
    /// ceiling is reached (reported once).
    pub(crate) async fn try_reconnect(&self) {
        loop {
            if self.state.read().await.was_manual_disconnect {
                tracing::info!("Manual disconnect detected, will not attempt to reconnect");
                return;
            }

            {
                let state = self.connection.state().await;
                if state == ConnectionState::Connected || state == ConnectionState::Connecting {
                    tracing::info!("Already connected or connecting, stopping reconnection attempts");
                    return;
                }
            }

            let delay = {
                let mut state = self.state.write().await;
                state.reconnect.next_delay()
            };

            let Some(delay) = delay else {
                let report = {
                    let mut state = self.state.write().await;
                    let first = !state.exhaustion_reported;
                    state.exhaustion_reported = true;
                    first
                };
                if report {
                    tracing::warn!(
                        "Reconnect ceiling reached for {}, giving up until an explicit connect",
                        self.endpoint
                    );
                    let detail = ErrorDetail::new(
                        ErrorKind::Exhausted,
                        &self.endpoint,
                        self.connection.state().await,
                        "reconnect ceiling reached".to_string(),
                    );
                    self.handlers.emit_error(&detail);
                }
                return;
            };

            let attempt = self.state.read().await.reconnect.attempts();
            tracing::info!("Reconnect attempt {} in {:?}", attempt, delay);
            tokio::time::sleep(delay).await;

            // A manual disconnect during the delay cancels the attempt
            if self.state.read().await.was_manual_disconnect {
                return;
            }

            match self.establish().await {
                Ok(()) => {
                    tracing::info!("Reconnected successfully");
                    return;
                }
                Err(e) => {
                    tracing::warn!("Reconnection attempt {} failed: {}", attempt, e);
                }
            }
        }
    }
}

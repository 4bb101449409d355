use super::{ErrorDetail, ErrorKind, EventKind, MonitorHandlers};
use crate::client::{ClientState, ConnectionManager};
use crate::types::Envelope;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Routes inbound frames to the registered handlers.
///
/// Pure parse-and-dispatch: the router holds no transport handle and mutates
/// nothing except the facade's last-received envelope.
pub struct MessageRouter {
    endpoint: String,
    handlers: Arc<MonitorHandlers>,
    connection: Arc<ConnectionManager>,
    state: Arc<RwLock<ClientState>>,
}

impl MessageRouter {
    pub fn new(
        endpoint: String,
        handlers: Arc<MonitorHandlers>,
        connection: Arc<ConnectionManager>,
        state: Arc<RwLock<ClientState>>,
    ) -> Self {
        Self {
            endpoint,
            handlers,
            connection,
            state,
        }
    }

    /// Parses one raw frame and dispatches it.
    ///
    /// A parse failure is a content-level warning carrying the raw payload,
    /// never a reason to close the connection: one malformed frame must not
    /// take down an otherwise healthy stream.
    pub async fn dispatch(&self, raw: &str) {
        let envelope = match serde_json::from_str::<Envelope>(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("Failed to parse frame: {} - Raw: {}", e, raw);
                let detail = ErrorDetail::new(
                    ErrorKind::Content,
                    &self.endpoint,
                    self.connection.state().await,
                    format!("frame failed to parse: {}", e),
                )
                .with_raw(raw);
                self.handlers.emit_error(&detail);
                return;
            }
        };

        tracing::debug!("Dispatching event: kind={}", envelope.kind);

        self.state.write().await.last_message = Some(envelope.clone());

        // Generic handler first, then the typed handler for the kind.
        if let Some(handler) = &self.handlers.on_message {
            handler(&envelope);
        }

        let task_id = envelope.task_id.as_deref().unwrap_or_default();
        let data = envelope.data.clone().unwrap_or(serde_json::Value::Null);

        match &envelope.kind {
            EventKind::ProgressUpdate => {
                if let Some(handler) = &self.handlers.on_progress_update {
                    handler(task_id, &data);
                }
            }
            EventKind::ItemScraped => {
                if let Some(handler) = &self.handlers.on_item_scraped {
                    handler(task_id, &data);
                }
            }
            EventKind::TaskStatusChange => {
                if let Some(handler) = &self.handlers.on_task_status_change {
                    let status = data.get("status").and_then(|v| v.as_str()).unwrap_or("");
                    handler(status, &data);
                }
            }
            EventKind::TaskError => {
                let reason = data
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or("task failed")
                    .to_string();
                let detail = ErrorDetail::new(
                    ErrorKind::Task,
                    &self.endpoint,
                    self.connection.state().await,
                    reason,
                )
                .with_data(data);
                self.handlers.emit_error(&detail);
            }
            // Unregistered kinds are not an error; they already reached the
            // generic handler above.
            _ => {}
        }
    }
}

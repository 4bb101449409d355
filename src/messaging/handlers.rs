use crate::client::ConnectionState;
use crate::types::Envelope;

/// Classifies a failure delivered through the error handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed endpoint, detected before any connection attempt
    Configuration,

    /// Network/protocol failure on the transport
    Transport,

    /// Inbound frame that failed to parse as a valid envelope
    Content,

    /// Task-level `error` event pushed by the server
    Task,

    /// Reconnect ceiling reached; automatic retry has stopped
    Exhausted,
}

/// Structured diagnostic detail passed to the error handler.
///
/// Failures never cross the public boundary as panics or return-path errors
/// from callbacks; everything observable lands here plus in the connection
/// state itself.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    /// Endpoint the connection targets
    pub endpoint: String,
    /// Connection state at the time the failure was observed
    pub state: ConnectionState,
    /// Human-readable reason
    pub reason: String,
    /// Raw payload, attached for content errors
    pub raw: Option<String>,
    /// Structured payload, attached for task-level error events
    pub data: Option<serde_json::Value>,
    pub timestamp: String,
}

impl ErrorDetail {
    pub fn new(kind: ErrorKind, endpoint: &str, state: ConnectionState, reason: String) -> Self {
        Self {
            kind,
            endpoint: endpoint.to_string(),
            state,
            reason,
            raw: None,
            data: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Generic handler receiving every successfully parsed envelope.
pub type MessageHandler = Box<dyn Fn(&Envelope) + Send + Sync>;

/// Per-task handler receiving `(task_id, data)`.
pub type TaskEventHandler = Box<dyn Fn(&str, &serde_json::Value) + Send + Sync>;

/// Status handler receiving `(status, data)`.
pub type StatusHandler = Box<dyn Fn(&str, &serde_json::Value) + Send + Sync>;

/// Handler for transport, content, task and exhaustion failures.
pub type ErrorHandler = Box<dyn Fn(&ErrorDetail) + Send + Sync>;

/// Lifecycle handler, fired on connect/disconnect transitions.
pub type LifecycleHandler = Box<dyn Fn() + Send + Sync>;

/// Named handler slots, supplied once at construction and immutable for the
/// client's life. Unset slots simply skip dispatch; unknown event kinds are
/// delivered only to `on_message`.
#[derive(Default)]
pub struct MonitorHandlers {
    /// Receives every parsed envelope, regardless of kind
    pub on_message: Option<MessageHandler>,
    /// `progress_update` events
    pub on_progress_update: Option<TaskEventHandler>,
    /// `item_scraped` events
    pub on_item_scraped: Option<TaskEventHandler>,
    /// `task_status_change` events, with the status extracted from the payload
    pub on_task_status_change: Option<StatusHandler>,
    /// Transport, content, task-level and exhaustion failures
    pub on_error: Option<ErrorHandler>,
    /// Fired after every successful open
    pub on_connect: Option<LifecycleHandler>,
    /// Fired on every transition out of `connected`
    pub on_disconnect: Option<LifecycleHandler>,
}

impl MonitorHandlers {
    pub(crate) fn emit_error(&self, detail: &ErrorDetail) {
        if let Some(handler) = &self.on_error {
            handler(detail);
        }
    }

    pub(crate) fn emit_connect(&self) {
        if let Some(handler) = &self.on_connect {
            handler();
        }
    }

    pub(crate) fn emit_disconnect(&self) {
        if let Some(handler) = &self.on_disconnect {
            handler();
        }
    }
}

impl std::fmt::Debug for MonitorHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorHandlers")
            .field("on_message", &self.on_message.is_some())
            .field("on_progress_update", &self.on_progress_update.is_some())
            .field("on_item_scraped", &self.on_item_scraped.is_some())
            .field(
                "on_task_status_change",
                &self.on_task_status_change.is_some(),
            )
            .field("on_error", &self.on_error.is_some())
            .field("on_connect", &self.on_connect.is_some())
            .field("on_disconnect", &self.on_disconnect.is_some())
            .finish()
    }
}

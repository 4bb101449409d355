use serde::{Deserialize, Serialize};

use crate::messaging::EventKind;

/// The message unit exchanged over the connection. One transport frame
/// carries exactly one envelope, JSON-encoded.
///
/// `kind` (wire field `type`) is required and drives dispatch; everything
/// else is optional and kind-specific.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Envelope {
    /// Build an outbound envelope with a fresh timestamp.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            task_id: None,
            data: None,
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Outbound `subscribe_task` frame for one task id.
    pub fn subscribe(task_id: impl Into<String>) -> Self {
        Self::new(EventKind::SubscribeTask).with_task_id(task_id)
    }

    /// Outbound `unsubscribe_task` frame for one task id.
    pub fn unsubscribe(task_id: impl Into<String>) -> Self {
        Self::new(EventKind::UnsubscribeTask).with_task_id(task_id)
    }

    /// Outbound keepalive frame.
    pub fn ping() -> Self {
        Self::new(EventKind::Ping)
    }
}

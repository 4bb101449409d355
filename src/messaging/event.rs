use crate::types::constants::events;
use serde::{Deserialize, Serialize};

/// Type-safe event kinds carried in the envelope `type` field.
///
/// The wire keeps an open `type` space so the server can introduce new event
/// kinds without breaking older clients; anything this client does not know
/// lands in `Custom` and flows only to the generic message handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Incremental progress data for a running task
    ProgressUpdate,

    /// One produced record
    ItemScraped,

    /// New task status plus optional detail payload
    TaskStatusChange,

    /// Task-level failure detail
    TaskError,

    /// Client subscription request for a task
    SubscribeTask,

    /// Client subscription removal for a task
    UnsubscribeTask,

    /// Keepalive frame
    Ping,

    /// Any other server-defined event
    Custom(String),
}

impl EventKind {
    /// Parse a wire string into an EventKind
    pub fn parse(s: &str) -> Self {
        match s {
            events::PROGRESS_UPDATE => Self::ProgressUpdate,
            events::ITEM_SCRAPED => Self::ItemScraped,
            events::TASK_STATUS_CHANGE => Self::TaskStatusChange,
            events::TASK_ERROR => Self::TaskError,
            events::SUBSCRIBE_TASK => Self::SubscribeTask,
            events::UNSUBSCRIBE_TASK => Self::UnsubscribeTask,
            events::PING => Self::Ping,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// Convert the kind to its wire string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::ProgressUpdate => events::PROGRESS_UPDATE,
            Self::ItemScraped => events::ITEM_SCRAPED,
            Self::TaskStatusChange => events::TASK_STATUS_CHANGE,
            Self::TaskError => events::TASK_ERROR,
            Self::SubscribeTask => events::SUBSCRIBE_TASK,
            Self::UnsubscribeTask => events::UNSUBSCRIBE_TASK,
            Self::Ping => events::PING,
            Self::Custom(s) => s,
        }
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// The wire encodes the kind as a bare string, so serde goes through
// `as_str`/`parse` rather than the derived enum representation.
impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_parse() {
        assert_eq!(
            EventKind::parse("progress_update"),
            EventKind::ProgressUpdate
        );
        assert_eq!(EventKind::parse("item_scraped"), EventKind::ItemScraped);
        assert_eq!(
            EventKind::parse("task_status_change"),
            EventKind::TaskStatusChange
        );
        assert_eq!(EventKind::parse("error"), EventKind::TaskError);
        assert_eq!(
            EventKind::parse("queue_depth"),
            EventKind::Custom("queue_depth".to_string())
        );
    }

    #[test]
    fn test_event_kind_round_trip() {
        let kinds = vec![
            EventKind::ProgressUpdate,
            EventKind::ItemScraped,
            EventKind::TaskStatusChange,
            EventKind::TaskError,
            EventKind::SubscribeTask,
            EventKind::UnsubscribeTask,
            EventKind::Ping,
            EventKind::Custom("queue_depth".to_string()),
        ];

        for kind in kinds {
            let s = kind.as_str().to_string();
            assert_eq!(EventKind::parse(&s), kind);
        }
    }

    #[test]
    fn test_event_kind_serializes_as_plain_string() {
        let json = serde_json::to_string(&EventKind::Custom("queue_depth".to_string())).unwrap();
        assert_eq!(json, r#""queue_depth""#);

        let kind: EventKind = serde_json::from_str(r#""error""#).unwrap();
        assert_eq!(kind, EventKind::TaskError);
    }
}

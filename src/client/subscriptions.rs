use crate::types::Envelope;

/// Client-side record of the task ids the caller wants events for.
///
/// Insertion-ordered set semantics: adding an id twice is a no-op, and
/// replay after reconnect emits exactly one `subscribe_task` frame per
/// distinct id, in the order the caller first subscribed. This is not an
/// ownership relationship with the server; entries survive the transport
/// teardown/rebuild and are replayed on every new connection.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    task_ids: Vec<String>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            task_ids: Vec::new(),
        }
    }

    /// Returns true if the id was newly added
    pub fn add(&mut self, task_id: impl Into<String>) -> bool {
        let task_id = task_id.into();
        if self.task_ids.iter().any(|id| *id == task_id) {
            return false;
        }
        self.task_ids.push(task_id);
        true
    }

    /// Returns true if the id was present
    pub fn remove(&mut self, task_id: &str) -> bool {
        let before = self.task_ids.len();
        self.task_ids.retain(|id| id != task_id);
        self.task_ids.len() != before
    }

    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    /// Outbound `subscribe_task` envelopes for every active subscription,
    /// in insertion order.
    pub fn replay_envelopes(&self) -> Vec<Envelope> {
        self.task_ids
            .iter()
            .map(|id| Envelope::subscribe(id.clone()))
            .collect()
    }
}

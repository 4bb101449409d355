use tokio::task::JoinHandle;

/// Tracks the background tasks owned by one transport generation (read loop,
/// heartbeat) so teardown can abort them together.
pub struct TaskManager {
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawn a named task and track it
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        self.handles.push((name, handle));
    }

    /// Track a task spawned elsewhere
    pub fn track(&mut self, name: &'static str, handle: JoinHandle<()>) {
        self.handles.push((name, handle));
    }

    /// Abort all tracked tasks without waiting
    pub fn abort_all(&mut self) {
        for (name, handle) in &self.handles {
            tracing::debug!("Aborting background task: {}", name);
            handle.abort();
        }
        self.handles.clear();
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

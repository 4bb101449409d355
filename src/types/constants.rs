/// Wire event strings (magic strings layer)
pub mod events {
    pub const PROGRESS_UPDATE: &str = "progress_update";
    pub const ITEM_SCRAPED: &str = "item_scraped";
    pub const TASK_STATUS_CHANGE: &str = "task_status_change";
    pub const TASK_ERROR: &str = "error";
    pub const SUBSCRIBE_TASK: &str = "subscribe_task";
    pub const UNSUBSCRIBE_TASK: &str = "unsubscribe_task";
    pub const PING: &str = "ping";
}

/// Real-time-capable URL schemes accepted for the endpoint
pub const ACCEPTED_SCHEMES: [&str; 2] = ["ws", "wss"];

/// Default keepalive ping interval (milliseconds)
pub const PING_INTERVAL: u64 = 30_000;

/// Default delay between automatic reconnect attempts (milliseconds)
pub const RECONNECT_DELAY: u64 = 3_000;

/// Default ceiling on consecutive automatic reconnect attempts
pub const RECONNECT_CEILING: u32 = 5;

//! # scrape-monitor-rs
//!
//! A resilient WebSocket client for streaming scraper task events to a
//! dashboard: progress updates, scraped items, status transitions and task
//! errors, multiplexed over one long-lived connection with automatic
//! reconnection and per-task subscription replay.
//!
//! ## Example
//!
//! ```no_run
//! use scrape_monitor_rs::{MonitorClient, MonitorClientOptions, MonitorHandlers};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handlers = MonitorHandlers {
//!         on_task_status_change: Some(Box::new(|status, data| {
//!             println!("task status: {} ({})", status, data);
//!         })),
//!         ..Default::default()
//!     };
//!
//!     let client = MonitorClient::new(
//!         "wss://scraper.example.com/ws/monitor",
//!         MonitorClientOptions::default(),
//!         handlers,
//!     )?;
//!
//!     client.connect().await?;
//!     client.subscribe_to_task("task-42").await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod infrastructure;
pub mod messaging;
pub mod types;
pub mod websocket;

pub use client::{
    ConnectionManager, ConnectionState, MonitorClient, MonitorClientBuilder, MonitorClientOptions,
    SubscriptionRegistry,
};
pub use messaging::{ErrorDetail, ErrorKind, EventKind, MessageRouter, MonitorHandlers};
pub use types::{Envelope, MonitorError, Result};

// Module declarations
mod builder;
mod connection;
mod core;
mod state;
mod subscriptions;

// Public API exports
pub use builder::{MonitorClientBuilder, MonitorClientOptions};
pub use connection::{ConnectionManager, ConnectionState};
pub use core::MonitorClient;
pub use state::ClientState;
pub use subscriptions::SubscriptionRegistry;

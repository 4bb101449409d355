// Infrastructure module - background services and timing policy
pub mod heartbeat;
pub mod reconnect;
pub mod task_manager;

pub use heartbeat::HeartbeatMonitor;
pub use reconnect::ReconnectPolicy;
pub use task_manager::TaskManager;

// Messaging module - event kinds, handler configuration and frame routing
pub mod event;
pub mod handlers;
pub mod router;

pub use event::EventKind;
pub use handlers::{ErrorDetail, ErrorKind, MonitorHandlers};
pub use router::MessageRouter;

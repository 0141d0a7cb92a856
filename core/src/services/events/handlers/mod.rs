//! Built-in event handlers.

mod audit_trail;
mod tracing_log;

pub use audit_trail::{register_user_audit_trail, AuditTrailHandler};
pub use tracing_log::TracingEventHandler;

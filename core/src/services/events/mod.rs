//! Post-commit domain event dispatch
//!
//! - `notification` - wrapper carrying one event to its handlers
//! - `handler` - the handler contract
//! - `dispatcher` - startup-built registry routing on the concrete event type
//! - `handlers` - tracing and audit trail reactions

mod dispatcher;
mod handler;
pub mod handlers;
mod notification;


pub use dispatcher::{EventDispatcher, EventDispatcherBuilder};
pub use handler::EventHandler;
pub use handlers::{register_user_audit_trail, AuditTrailHandler, TracingEventHandler};
pub use notification::EventNotification;

//! Structured log line per dispatched event

use async_trait::async_trait;
use tracing::info;

use crate::domain::events::DomainEvent;
use crate::errors::DomainError;
use crate::services::events::{EventHandler, EventNotification};

/// Logs every event it receives; never fails
///
/// Registrable for any event type.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventHandler;

impl TracingEventHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<E: DomainEvent> EventHandler<E> for TracingEventHandler {
    async fn handle(&self, notification: &EventNotification<E>) -> Result<(), DomainError> {
        let event = notification.event();
        info!(
            event_type = event.event_type(),
            entity_id = %event.entity_id(),
            occurred_at = %event.occurred_at(),
            "Domain event"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

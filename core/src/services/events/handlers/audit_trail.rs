//! Projects committed events into audit log records

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::domain::entities::audit::AuditLog;
use crate::domain::events::{
    DomainEvent, UserBlocked, UserLoggedIn, UserRegistered, UserTypeSelected, UserUnblocked,
    UserVerified,
};
use crate::errors::DomainError;
use crate::repositories::AuditLogRepository;
use crate::services::events::{EventDispatcherBuilder, EventHandler, EventNotification};

/// Writes one [`AuditLog`] per event, with the serialized event as details
///
/// The entity type is the event name's prefix (`user` for `user.blocked`).
pub struct AuditTrailHandler<R>
where
    R: AuditLogRepository,
{
    repository: Arc<R>,
}

impl<R: AuditLogRepository> AuditTrailHandler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: AuditLogRepository> Clone for AuditTrailHandler<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[async_trait]
impl<R, E> EventHandler<E> for AuditTrailHandler<R>
where
    R: AuditLogRepository + 'static,
    E: DomainEvent + Serialize,
{
    async fn handle(&self, notification: &EventNotification<E>) -> Result<(), DomainError> {
        let event = notification.event();
        let entity_type = event
            .event_type()
            .split_once('.')
            .map(|(prefix, _)| prefix)
            .unwrap_or("unknown");

        let mut log = AuditLog::for_event(entity_type, event);
        match serde_json::to_value(event) {
            Ok(details) => log = log.with_details(details),
            Err(e) => warn!(event_type = event.event_type(), error = %e, "Event details not serializable"),
        }

        self.repository.create(&log).await
    }

    fn name(&self) -> &str {
        "audit_trail"
    }
}

/// Registers an audit trail handler for every user event
pub fn register_user_audit_trail<R>(
    builder: EventDispatcherBuilder,
    repository: Arc<R>,
) -> EventDispatcherBuilder
where
    R: AuditLogRepository + 'static,
{
    let handler = AuditTrailHandler::new(repository);
    builder
        .register::<UserRegistered, _>(handler.clone())
        .register::<UserTypeSelected, _>(handler.clone())
        .register::<UserVerified, _>(handler.clone())
        .register::<UserBlocked, _>(handler.clone())
        .register::<UserUnblocked, _>(handler.clone())
        .register::<UserLoggedIn, _>(handler)
}

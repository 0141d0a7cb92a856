//! Audit log record projected from committed domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::events::DomainEvent;
use crate::domain::value_objects::Identifier;

/// Represents an audit log entry for a committed domain event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLog {
    /// Unique identifier for the log entry
    pub id: Uuid,

    /// Entity the event happened to
    pub entity_id: Identifier,

    /// Entity type name (e.g. "user")
    pub entity_type: String,

    /// Event name (e.g. "user.blocked")
    pub event_type: String,

    /// When the change happened
    pub occurred_at: DateTime<Utc>,

    /// When the log entry was written
    pub recorded_at: DateTime<Utc>,

    /// Additional event data in JSON format
    pub details: Option<JsonValue>,
}

impl AuditLog {
    /// Create a new audit log entry
    pub fn new(
        entity_id: Identifier,
        entity_type: impl Into<String>,
        event_type: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_id,
            entity_type: entity_type.into(),
            event_type: event_type.into(),
            occurred_at,
            recorded_at: Utc::now(),
            details: None,
        }
    }

    /// Create an audit log entry describing `event`
    pub fn for_event(entity_type: impl Into<String>, event: &dyn DomainEvent) -> Self {
        Self::new(
            event.entity_id(),
            entity_type,
            event.event_type(),
            event.occurred_at(),
        )
    }

    /// Add event data as JSON
    pub fn with_details(mut self, details: JsonValue) -> Self {
        self.details = Some(details);
        self
    }
}

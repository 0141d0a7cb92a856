//! Notification wrapper carried through the dispatcher

use std::ops::Deref;

use crate::domain::events::DomainEvent;

/// Carries exactly one domain event to its handlers
///
/// Holds no state of its own. Routing happens on `E`, so events never need
/// to know about the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct EventNotification<E: DomainEvent> {
    event: E,
}

impl<E: DomainEvent> EventNotification<E> {
    pub fn wrap(event: E) -> Self {
        Self { event }
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn into_inner(self) -> E {
        self.event
    }
}

impl<E: DomainEvent> Deref for EventNotification<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.event
    }
}

impl<E: DomainEvent> From<E> for EventNotification<E> {
    fn from(event: E) -> Self {
        Self::wrap(event)
    }
}

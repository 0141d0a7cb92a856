//! Entity contract and the pending domain event buffer.

use crate::domain::downcast::AsAny;
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::Identifier;

/// Ordered events recorded by one entity since the last flush.
///
/// Entities keep this as a private field and append to it only from their
/// own state-changing operations. The unit of work drains it after commit.
#[derive(Debug, Default)]
pub struct PendingEvents {
    events: Vec<Box<dyn DomainEvent>>,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event after the ones already pending
    pub fn record<E: DomainEvent>(&mut self, event: E) {
        self.events.push(Box::new(event));
    }

    /// Returns every pending event in recording order and leaves the buffer empty
    pub fn drain(&mut self) -> Vec<Box<dyn DomainEvent>> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DomainEvent> {
        self.events.iter().map(|event| event.as_ref())
    }

    /// Event type names in recording order
    pub fn event_types(&self) -> Vec<&'static str> {
        self.iter().map(|event| event.event_type()).collect()
    }
}

/// An object with identity whose changes are tracked by a unit of work
///
/// Entities expose state-changing operations only; each business-meaningful
/// change records a matching domain event. Instances are confined to a single
/// unit of work and are not shared between threads while being mutated.
pub trait Entity: AsAny {
    /// The entity's identifier
    fn id(&self) -> Identifier;

    /// Short type name used in logs and by storage (`"user"`)
    fn entity_type(&self) -> &'static str;

    /// Events recorded since the last drain
    fn pending_events(&self) -> &PendingEvents;

    /// Returns the pending events in recording order and clears them.
    /// Returns an empty vector when nothing is pending.
    fn drain_events(&mut self) -> Vec<Box<dyn DomainEvent>>;
}

impl dyn Entity {
    /// Borrows the entity as concrete type `T`
    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

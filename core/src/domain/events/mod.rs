//! Domain events: immutable records of business-significant state changes.
//!
//! Events carry the entity id, the business fields of the change and the
//! time it happened. They never reference dispatch, transport or storage
//! types; routing happens on the concrete event type (see
//! `services::events::EventDispatcher`).

mod user_events;

use std::any::TypeId;
use std::fmt;

use chrono::{DateTime, Utc};

use super::downcast::AsAny;
use super::value_objects::Identifier;

pub use user_events::{
    UserBlocked, UserLoggedIn, UserRegistered, UserTypeSelected, UserUnblocked, UserVerified,
};

/// Behaviour shared by every domain event
pub trait DomainEvent: AsAny + fmt::Debug {
    /// Stable dotted event name, e.g. `user.registered`
    fn event_type(&self) -> &'static str;

    /// Identifier of the entity the event happened to
    fn entity_id(&self) -> Identifier;

    /// When the change happened
    fn occurred_at(&self) -> DateTime<Utc>;
}

impl dyn DomainEvent {
    /// `TypeId` of the concrete event behind the trait object
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Whether the event is of concrete type `E`
    pub fn is<E: DomainEvent>(&self) -> bool {
        self.as_any().is::<E>()
    }

    /// Borrows the event as concrete type `E`
    pub fn downcast_ref<E: DomainEvent>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}

/// Implements [`DomainEvent`] for a struct with `user_id` and `occurred_at` fields.
macro_rules! impl_domain_event {
    ($event:ty, $name:literal, $id_field:ident) => {
        impl $crate::domain::events::DomainEvent for $event {
            fn event_type(&self) -> &'static str {
                $name
            }

            fn entity_id(&self) -> $crate::domain::value_objects::Identifier {
                self.$id_field
            }

            fn occurred_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.occurred_at
            }
        }
    };
}

pub(crate) use impl_domain_event;

//! Events recorded by the [`User`](crate::domain::entities::User) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::user::UserType;
use crate::domain::value_objects::Identifier;

use super::impl_domain_event;

/// A new user account was created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub user_id: Identifier,
    pub country_code: String,
    pub occurred_at: DateTime<Utc>,
}

/// The user chose whether they are a customer or a worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTypeSelected {
    pub user_id: Identifier,
    pub user_type: UserType,
    pub occurred_at: DateTime<Utc>,
}

/// The user's phone number was verified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserVerified {
    pub user_id: Identifier,
    pub occurred_at: DateTime<Utc>,
}

/// The account was blocked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBlocked {
    pub user_id: Identifier,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// A blocked account was reinstated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUnblocked {
    pub user_id: Identifier,
    pub occurred_at: DateTime<Utc>,
}

/// The user signed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoggedIn {
    pub user_id: Identifier,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(UserRegistered, "user.registered", user_id);
impl_domain_event!(UserTypeSelected, "user.type_selected", user_id);
impl_domain_event!(UserVerified, "user.verified", user_id);
impl_domain_event!(UserBlocked, "user.blocked", user_id);
impl_domain_event!(UserUnblocked, "user.unblocked", user_id);
impl_domain_event!(UserLoggedIn, "user.logged_in", user_id);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::DomainEvent;

    #[test]
    fn test_event_metadata() {
        let user_id = Identifier::new();
        let now = Utc::now();
        let event = UserBlocked {
            user_id,
            reason: "chargeback".to_string(),
            occurred_at: now,
        };

        assert_eq!(event.event_type(), "user.blocked");
        assert_eq!(event.entity_id(), user_id);
        assert_eq!(event.occurred_at(), now);
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let event: Box<dyn DomainEvent> = Box::new(UserVerified {
            user_id: Identifier::new(),
            occurred_at: Utc::now(),
        });

        assert!(event.is::<UserVerified>());
        assert!(!event.is::<UserLoggedIn>());
        assert!(event.downcast_ref::<UserVerified>().is_some());
        assert_eq!(
            event.concrete_type_id(),
            std::any::TypeId::of::<UserVerified>()
        );
    }

    #[test]
    fn test_event_serialization_uses_plain_identifier() {
        let user_id = Identifier::new();
        let event = UserTypeSelected {
            user_id,
            user_type: UserType::Worker,
            occurred_at: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["user_id"], serde_json::json!(user_id.to_string()));
        assert_eq!(json["user_type"], serde_json::json!("worker"));
    }
}

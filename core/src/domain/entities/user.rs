//! User entity representing a registered user in the Eventide system.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::events::{
    DomainEvent, UserBlocked, UserLoggedIn, UserRegistered, UserTypeSelected, UserUnblocked,
    UserVerified,
};
use crate::domain::value_objects::Identifier;
use crate::errors::DomainError;

use super::entity::{Entity, PendingEvents};

/// Represents the type of user in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// A customer booking jobs
    Customer,
    /// A worker taking jobs
    Worker,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Customer => write!(f, "customer"),
            UserType::Worker => write!(f, "worker"),
        }
    }
}

/// Persisted state of a [`User`], without pending events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: Identifier,
    pub phone_hash: String,
    pub country_code: String,
    pub user_type: Option<UserType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub is_blocked: bool,
}

/// User entity representing a registered user
#[derive(Debug)]
pub struct User {
    id: Identifier,
    phone_hash: String,
    country_code: String,
    user_type: Option<UserType>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
    is_verified: bool,
    is_blocked: bool,
    events: PendingEvents,
}

impl User {
    /// Registers a new user and records `UserRegistered`
    ///
    /// # Arguments
    ///
    /// * `phone_hash` - SHA-256 hash of the phone number
    /// * `country_code` - International dialling code, e.g. `+61`
    ///
    /// # Errors
    ///
    /// * `DomainError::Validation` - empty phone hash or malformed country code
    pub fn register(
        phone_hash: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::register_with_id(Identifier::new(), phone_hash, country_code)
    }

    /// Registers a new user under a caller-chosen identifier
    pub fn register_with_id(
        id: Identifier,
        phone_hash: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let phone_hash = phone_hash.into();
        let country_code = country_code.into();

        if phone_hash.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "phone hash cannot be empty".to_string(),
            });
        }
        if !is_valid_country_code(&country_code) {
            return Err(DomainError::Validation {
                message: format!("invalid country code: {}", country_code),
            });
        }

        let now = Utc::now();
        let mut user = Self {
            id,
            phone_hash,
            country_code,
            user_type: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
            is_verified: false,
            is_blocked: false,
            events: PendingEvents::new(),
        };
        user.events.record(UserRegistered {
            user_id: id,
            country_code: user.country_code.clone(),
            occurred_at: now,
        });
        Ok(user)
    }

    /// Rebuilds a user loaded from storage; records no events
    pub fn restore(snapshot: UserSnapshot) -> Self {
        Self {
            id: snapshot.id,
            phone_hash: snapshot.phone_hash,
            country_code: snapshot.country_code,
            user_type: snapshot.user_type,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
            last_login_at: snapshot.last_login_at,
            is_verified: snapshot.is_verified,
            is_blocked: snapshot.is_blocked,
            events: PendingEvents::new(),
        }
    }

    /// Copies the persistent state for storage
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            phone_hash: self.phone_hash.clone(),
            country_code: self.country_code.clone(),
            user_type: self.user_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_login_at: self.last_login_at,
            is_verified: self.is_verified,
            is_blocked: self.is_blocked,
        }
    }

    /// Selects the user type; it cannot be changed afterwards
    ///
    /// Selecting the type already chosen is a no-op.
    pub fn select_type(&mut self, user_type: UserType) -> Result<(), DomainError> {
        match self.user_type {
            Some(current) if current == user_type => return Ok(()),
            Some(current) => {
                return Err(DomainError::BusinessRule {
                    message: format!("user type already selected as {}", current),
                })
            }
            None => {}
        }
        self.ensure_not_blocked()?;

        let now = self.touch();
        self.user_type = Some(user_type);
        self.events.record(UserTypeSelected {
            user_id: self.id,
            user_type,
            occurred_at: now,
        });
        Ok(())
    }

    /// Marks the user as verified
    pub fn verify(&mut self) {
        if self.is_verified {
            return;
        }
        let now = self.touch();
        self.is_verified = true;
        self.events.record(UserVerified {
            user_id: self.id,
            occurred_at: now,
        });
    }

    /// Blocks the user account
    pub fn block(&mut self, reason: impl Into<String>) {
        if self.is_blocked {
            return;
        }
        let now = self.touch();
        self.is_blocked = true;
        self.events.record(UserBlocked {
            user_id: self.id,
            reason: reason.into(),
            occurred_at: now,
        });
    }

    /// Unblocks the user account
    pub fn unblock(&mut self) {
        if !self.is_blocked {
            return;
        }
        let now = self.touch();
        self.is_blocked = false;
        self.events.record(UserUnblocked {
            user_id: self.id,
            occurred_at: now,
        });
    }

    /// Records a successful sign-in
    pub fn record_login(&mut self) -> Result<(), DomainError> {
        self.ensure_not_blocked()?;
        let now = self.touch();
        self.last_login_at = Some(now);
        self.events.record(UserLoggedIn {
            user_id: self.id,
            occurred_at: now,
        });
        Ok(())
    }

    pub fn phone_hash(&self) -> &str {
        &self.phone_hash
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn user_type(&self) -> Option<UserType> {
        self.user_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn is_blocked(&self) -> bool {
        self.is_blocked
    }

    /// Checks if the user has selected a user type
    pub fn has_user_type(&self) -> bool {
        self.user_type.is_some()
    }

    fn ensure_not_blocked(&self) -> Result<(), DomainError> {
        if self.is_blocked {
            return Err(DomainError::BusinessRule {
                message: format!("user {} is blocked", self.id),
            });
        }
        Ok(())
    }

    fn touch(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        self.updated_at = now;
        now
    }
}

impl Entity for User {
    fn id(&self) -> Identifier {
        self.id
    }

    fn entity_type(&self) -> &'static str {
        "user"
    }

    fn pending_events(&self) -> &PendingEvents {
        &self.events
    }

    fn drain_events(&mut self) -> Vec<Box<dyn DomainEvent>> {
        self.events.drain()
    }
}

/// `+` followed by one to four digits, no leading zero
static COUNTRY_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{0,3}$").unwrap()
});

fn is_valid_country_code(code: &str) -> bool {
    COUNTRY_CODE_REGEX.is_match(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered_user() -> User {
        User::register("hashed_phone", "+61").unwrap()
    }

    #[test]
    fn test_register_records_created_event() {
        let user = registered_user();

        assert_eq!(user.phone_hash(), "hashed_phone");
        assert_eq!(user.country_code(), "+61");
        assert_eq!(user.user_type(), None);
        assert!(!user.is_verified());
        assert!(!user.is_blocked());
        assert!(user.last_login_at().is_none());
        assert_eq!(user.pending_events().event_types(), vec!["user.registered"]);
    }

    #[test]
    fn test_register_validates_input() {
        assert!(matches!(
            User::register("", "+61"),
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            User::register("hash", "61"),
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            User::register("hash", "+12345"),
            Err(DomainError::Validation { .. })
        ));
        assert!(User::register("hash", "+1").is_ok());
        assert!(User::register("hash", "+1684").is_ok());
    }

    #[test]
    fn test_country_code_cannot_start_with_zero() {
        for code in ["+0", "+0000", "+061"] {
            assert!(
                matches!(User::register("hash", code), Err(DomainError::Validation { .. })),
                "{} should be rejected",
                code
            );
        }
    }

    #[test]
    fn test_operations_record_events_in_order() {
        let mut user = registered_user();
        user.select_type(UserType::Customer).unwrap();
        user.verify();
        user.record_login().unwrap();

        assert_eq!(
            user.pending_events().event_types(),
            vec![
                "user.registered",
                "user.type_selected",
                "user.verified",
                "user.logged_in"
            ]
        );

        let drained = user.drain_events();
        assert_eq!(drained.len(), 4);
        assert!(drained.iter().all(|e| e.entity_id() == user.id()));
        assert!(user.drain_events().is_empty());
    }

    #[test]
    fn test_select_type_cannot_change() {
        let mut user = registered_user();
        user.select_type(UserType::Worker).unwrap();
        user.drain_events();

        // same type again is a no-op
        user.select_type(UserType::Worker).unwrap();
        assert!(user.pending_events().is_empty());

        let result = user.select_type(UserType::Customer);
        assert!(matches!(result, Err(DomainError::BusinessRule { .. })));
        assert_eq!(user.user_type(), Some(UserType::Worker));
        assert!(user.pending_events().is_empty());
    }

    #[test]
    fn test_idempotent_operations_record_once() {
        let mut user = registered_user();
        user.drain_events();

        user.verify();
        user.verify();
        user.block("fraud");
        user.block("fraud again");
        user.unblock();
        user.unblock();

        assert_eq!(
            user.pending_events().event_types(),
            vec!["user.verified", "user.blocked", "user.unblocked"]
        );
    }

    #[test]
    fn test_blocked_user_cannot_log_in() {
        let mut user = registered_user();
        user.block("abuse");
        user.drain_events();

        assert!(matches!(
            user.record_login(),
            Err(DomainError::BusinessRule { .. })
        ));
        assert!(user.last_login_at().is_none());
        assert!(user.pending_events().is_empty());
    }

    #[test]
    fn test_snapshot_restore_has_no_events() {
        let mut user = registered_user();
        user.select_type(UserType::Customer).unwrap();
        let snapshot = user.snapshot();

        let restored = User::restore(snapshot.clone());
        assert_eq!(restored.id(), user.id());
        assert_eq!(restored.snapshot(), snapshot);
        assert!(restored.pending_events().is_empty());
    }

    #[test]
    fn test_user_type_serialization() {
        let json = serde_json::to_string(&UserType::Customer).unwrap();
        assert_eq!(json, "\"customer\"");

        let json = serde_json::to_string(&UserType::Worker).unwrap();
        assert_eq!(json, "\"worker\"");
    }
}

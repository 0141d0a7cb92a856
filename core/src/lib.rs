//! # Eventide Core
//!
//! Domain layer and services for the Eventide backend: entities that record
//! domain events, a unit of work that dispatches them exactly once after a
//! successful commit, and the access/refresh token service.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{AuditLog, Claims, Entity, PendingEvents, TokenKind, TokenPair, User, UserType};
pub use domain::events::DomainEvent;
pub use domain::value_objects::Identifier;
pub use errors::{
    DomainError, DomainResult, IdentifierError, ReactionError, TokenError, UnitOfWorkError,
};
pub use repositories::{AuditLogRepository, ChangeStore, RevokedTokenRepository};
pub use services::{
    CommitReceipt, EventDispatcher, EventHandler, EventNotification, TokenService, UnitOfWork,
    UnitOfWorkState,
};

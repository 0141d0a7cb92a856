//! Error types for identifiers, tokens and the unit of work
//!
//! Identifier and token errors are local and caller-fixable. Unit of work
//! failures are split in two: [`UnitOfWorkError`] when nothing was persisted,
//! and [`ReactionError`] when the data is durable but a handler failed.

use thiserror::Error;

use crate::domain::entities::token::TokenKind;
use crate::domain::value_objects::Identifier;
use crate::services::unit_of_work::UnitOfWorkState;

use super::DomainError;

/// Identifier construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Invalid argument: identifier cannot be the nil value")]
    InvalidArgument,

    #[error("Invalid format: '{value}' is not a valid identifier")]
    InvalidFormat { value: String },
}

/// Token-related errors
///
/// Everything except [`TokenError::TokenExpired`] means the token is invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Wrong token kind: expected {expected}, found {actual}")]
    WrongTokenKind {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("Invalid claims: {claim}")]
    InvalidClaims { claim: String },

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Key load error: {message}")]
    KeyLoadError { message: String },
}

impl TokenError {
    /// Whether the token was well-formed and signed but past its expiry
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::TokenExpired)
    }
}

/// A domain event handler failed after the storage commit succeeded
///
/// The data is durable; at least one downstream reaction did not run.
/// Retrying the write would re-trigger reactions that already happened.
#[derive(Error, Debug)]
#[error("Handler '{handler}' failed reacting to {event_type} for entity {entity_id}: {source}")]
pub struct ReactionError {
    /// Name of the event being dispatched
    pub event_type: &'static str,
    /// Entity the event belongs to
    pub entity_id: Identifier,
    /// Name of the failing handler
    pub handler: String,
    /// Error returned by the handler
    pub source: DomainError,
    /// Events drained in the same commit that were never dispatched
    pub undispatched_events: usize,
}

/// Unit of work failures; none of them comes with a commit receipt
#[derive(Error, Debug)]
pub enum UnitOfWorkError {
    #[error("Commit failed: {source}")]
    CommitFailure { source: DomainError },

    #[error("Unit of work cancelled before commit")]
    Cancelled,

    #[error("Unit of work already completed ({state})")]
    AlreadyCompleted { state: UnitOfWorkState },

    #[error("Unit of work commit was abandoned while {state}")]
    Abandoned { state: UnitOfWorkState },
}

impl UnitOfWorkError {
    /// Whether retrying the whole operation with a fresh unit of work is safe
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UnitOfWorkError::CommitFailure { .. } | UnitOfWorkError::Cancelled
        )
    }
}

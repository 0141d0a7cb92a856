//! Domain entities representing core business objects.

pub mod audit;
pub mod entity;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use audit::AuditLog;
pub use entity::{Entity, PendingEvents};
pub use token::{
    Claims, TokenKind, TokenPair,
    ACCESS_TOKEN_EXPIRY_MINUTES, REFRESH_TOKEN_EXPIRY_DAYS,
    JWT_ISSUER, JWT_AUDIENCE,
};
pub use user::{User, UserSnapshot, UserType};

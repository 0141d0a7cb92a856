//! Identifier value object shared by every entity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::IdentifierError;

/// Globally unique, never-nil identifier.
///
/// Two identifiers are equal iff their underlying UUIDs are equal. The raw
/// UUID is only handed out at storage and transport boundaries via
/// [`Identifier::into_uuid`] / [`Identifier::as_uuid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Uuid", into = "Uuid")]
pub struct Identifier(Uuid);

impl Identifier {
    /// Creates a new random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID
    ///
    /// # Errors
    ///
    /// * `IdentifierError::InvalidArgument` - the UUID is nil
    pub fn from_uuid(value: Uuid) -> Result<Self, IdentifierError> {
        if value.is_nil() {
            return Err(IdentifierError::InvalidArgument);
        }
        Ok(Self(value))
    }

    /// Parses the textual form of a UUID
    ///
    /// # Errors
    ///
    /// * `IdentifierError::InvalidFormat` - the text is not a UUID
    /// * `IdentifierError::InvalidArgument` - the text is the nil UUID
    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        let value = Uuid::parse_str(text).map_err(|_| IdentifierError::InvalidFormat {
            value: text.to_string(),
        })?;
        Self::from_uuid(value)
    }

    /// Borrows the raw UUID (storage/transport boundaries only)
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Converts back into the raw UUID (storage/transport boundaries only)
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Uuid> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: Uuid) -> Result<Self, Self::Error> {
        Self::from_uuid(value)
    }
}

impl From<Identifier> for Uuid {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

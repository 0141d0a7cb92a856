//! Storage contract used by the unit of work.

use async_trait::async_trait;

use crate::domain::entities::Entity;
use crate::errors::DomainError;

/// Atomic persistence of every entity changed in one unit of work
///
/// Implementations write all of `changes` or none of them. They must not
/// drain or otherwise touch the entities' pending events.
#[async_trait]
pub trait ChangeStore: Send + Sync {
    /// Persist `changes` in one transaction
    ///
    /// # Returns
    /// * `Ok(rows)` - number of rows written
    /// * `Err(DomainError)` - nothing was written
    async fn commit(&self, changes: &[&dyn Entity]) -> Result<u64, DomainError>;
}

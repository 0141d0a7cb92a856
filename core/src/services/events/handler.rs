//! Handler contract for domain event reactions

use async_trait::async_trait;

use crate::domain::events::DomainEvent;
use crate::errors::DomainError;

use super::notification::EventNotification;

/// Reacts to one domain event type after the unit of work has committed
///
/// Handlers for the same event run one after another in registration order,
/// so a handler may rely on the side effects of the ones registered before it.
/// Returning an error stops dispatch for the rest of the commit.
#[async_trait]
pub trait EventHandler<E: DomainEvent>: Send + Sync {
    async fn handle(&self, notification: &EventNotification<E>) -> Result<(), DomainError>;

    /// Name used in logs and in [`ReactionError`](crate::errors::ReactionError)
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

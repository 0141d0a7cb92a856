//! Routes domain events to the handlers registered for their concrete type

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use et_shared::config::EventsConfig;
use tracing::{debug, error, warn};

use crate::domain::downcast::AsAny;
use crate::domain::events::DomainEvent;
use crate::errors::{DomainError, ReactionError};

use super::handler::EventHandler;
use super::notification::EventNotification;

/// Type-erased list of handlers for one event type
#[async_trait]
trait HandlerChain: AsAny {
    fn len(&self) -> usize;

    async fn dispatch(
        &self,
        event: Box<dyn DomainEvent>,
        slow_threshold: Option<Duration>,
    ) -> Result<usize, ReactionError>;
}

struct TypedChain<E: DomainEvent> {
    handlers: Vec<Arc<dyn EventHandler<E>>>,
}

impl<E: DomainEvent> TypedChain<E> {
    async fn run(
        &self,
        notification: &EventNotification<E>,
        slow_threshold: Option<Duration>,
    ) -> Result<usize, ReactionError> {
        let event = notification.event();
        debug!(
            event_type = event.event_type(),
            entity_id = %event.entity_id(),
            handlers = self.handlers.len(),
            "Dispatching domain event"
        );

        for handler in &self.handlers {
            let started = Instant::now();
            let result = handler.handle(notification).await;
            let elapsed = started.elapsed();

            if let Some(threshold) = slow_threshold {
                if elapsed > threshold {
                    warn!(
                        event_type = event.event_type(),
                        handler = handler.name(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Slow domain event handler"
                    );
                }
            }

            if let Err(source) = result {
                error!(
                    event_type = event.event_type(),
                    entity_id = %event.entity_id(),
                    handler = handler.name(),
                    error = %source,
                    "Domain event handler failed"
                );
                return Err(ReactionError {
                    event_type: event.event_type(),
                    entity_id: event.entity_id(),
                    handler: handler.name().to_string(),
                    source,
                    undispatched_events: 0,
                });
            }
        }

        Ok(self.handlers.len())
    }
}

#[async_trait]
impl<E: DomainEvent> HandlerChain for TypedChain<E> {
    fn len(&self) -> usize {
        self.handlers.len()
    }

    async fn dispatch(
        &self,
        event: Box<dyn DomainEvent>,
        slow_threshold: Option<Duration>,
    ) -> Result<usize, ReactionError> {
        let event_type = event.event_type();
        let entity_id = event.entity_id();

        // chains are keyed by the event's TypeId
        let event = event.into_any().downcast::<E>().map_err(|_| ReactionError {
            event_type,
            entity_id,
            handler: "dispatcher".to_string(),
            source: DomainError::Internal {
                message: format!("handler chain mismatch for {}", event_type),
            },
            undispatched_events: 0,
        })?;

        self.run(&EventNotification::wrap(*event), slow_threshold).await
    }
}

/// Collects handler registrations at startup
///
/// ```
/// use et_core::services::events::{EventDispatcher, TracingEventHandler};
/// use et_core::domain::events::UserRegistered;
///
/// let dispatcher = EventDispatcher::builder()
///     .register::<UserRegistered, _>(TracingEventHandler::new())
///     .build();
/// assert_eq!(dispatcher.handler_count::<UserRegistered>(), 1);
/// ```
#[derive(Default)]
pub struct EventDispatcherBuilder {
    chains: HashMap<TypeId, Box<dyn HandlerChain>>,
    slow_handler_threshold: Option<Duration>,
}

impl EventDispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies dispatch settings
    pub fn with_config(mut self, config: &EventsConfig) -> Self {
        self.slow_handler_threshold = config.slow_handler_threshold();
        self
    }

    /// Appends `handler` to the handlers for `E`
    pub fn register<E, H>(self, handler: H) -> Self
    where
        E: DomainEvent,
        H: EventHandler<E> + 'static,
    {
        self.register_shared::<E>(Arc::new(handler))
    }

    /// Appends an already shared handler to the handlers for `E`
    pub fn register_shared<E: DomainEvent>(mut self, handler: Arc<dyn EventHandler<E>>) -> Self {
        let chain = self
            .chains
            .entry(TypeId::of::<E>())
            .or_insert_with(|| -> Box<dyn HandlerChain> {
                Box::new(TypedChain::<E> {
                    handlers: Vec::new(),
                })
            });

        if let Some(typed) = (**chain).as_any_mut().downcast_mut::<TypedChain<E>>() {
            typed.handlers.push(handler);
        }
        self
    }

    /// Freezes the registrations
    pub fn build(self) -> EventDispatcher {
        EventDispatcher {
            chains: self.chains,
            slow_handler_threshold: self.slow_handler_threshold,
        }
    }
}

/// Immutable event type to handler list mapping
///
/// Holds no per-call state; share it behind an `Arc`.
pub struct EventDispatcher {
    chains: HashMap<TypeId, Box<dyn HandlerChain>>,
    slow_handler_threshold: Option<Duration>,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("event_types", &self.chains.len())
            .field("slow_handler_threshold", &self.slow_handler_threshold)
            .finish()
    }
}

impl EventDispatcher {
    pub fn builder() -> EventDispatcherBuilder {
        EventDispatcherBuilder::new()
    }

    /// Runs every handler registered for `E`, in registration order
    ///
    /// # Returns
    ///
    /// * `Ok(n)` - number of handlers that ran; 0 when none are registered
    /// * `Err(ReactionError)` - the first handler failure; later handlers did not run
    pub async fn publish<E: DomainEvent>(
        &self,
        notification: EventNotification<E>,
    ) -> Result<usize, ReactionError> {
        let chain = self
            .chains
            .get(&TypeId::of::<E>())
            .and_then(|chain| (**chain).as_any().downcast_ref::<TypedChain<E>>());

        match chain {
            Some(chain) => chain.run(&notification, self.slow_handler_threshold).await,
            None => {
                debug!(
                    event_type = notification.event_type(),
                    "No handlers registered for domain event"
                );
                Ok(0)
            }
        }
    }

    /// Same as [`publish`](Self::publish) for an event whose type is only known at runtime
    pub async fn publish_boxed(&self, event: Box<dyn DomainEvent>) -> Result<usize, ReactionError> {
        match self.chains.get(&event.concrete_type_id()) {
            Some(chain) => chain.dispatch(event, self.slow_handler_threshold).await,
            None => {
                debug!(
                    event_type = event.event_type(),
                    "No handlers registered for domain event"
                );
                Ok(0)
            }
        }
    }

    /// Number of handlers registered for `E`
    pub fn handler_count<E: DomainEvent>(&self) -> usize {
        self.chains
            .get(&TypeId::of::<E>())
            .map(|chain| chain.len())
            .unwrap_or(0)
    }

    /// Number of event types with at least one handler
    pub fn event_type_count(&self) -> usize {
        self.chains.len()
    }
}

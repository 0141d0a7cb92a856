//! Commit hook: storage commit followed by exactly-once event dispatch

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::entities::Entity;
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::Identifier;
use crate::errors::{DomainError, ReactionError, UnitOfWorkError};
use crate::repositories::ChangeStore;
use crate::services::events::EventDispatcher;

use super::state::UnitOfWorkState;

/// Result of a commit that reached storage
///
/// `reaction_failure` is set when the data is durable but a handler failed;
/// callers should treat the business operation as done and report the failure.
#[derive(Debug)]
#[must_use]
pub struct CommitReceipt {
    /// Rows written by the store
    pub rows_affected: u64,
    /// Events whose handlers all ran
    pub events_dispatched: usize,
    /// First handler failure, if any
    pub reaction_failure: Option<ReactionError>,
}

impl CommitReceipt {
    /// Whether every event was dispatched without a handler failure
    pub fn is_clean(&self) -> bool {
        self.reaction_failure.is_none()
    }

    /// Terminal state this receipt corresponds to
    pub fn outcome(&self) -> UnitOfWorkState {
        if self.is_clean() {
            UnitOfWorkState::CommittedClean
        } else {
            UnitOfWorkState::CommittedWithReactionFailure
        }
    }

    /// Rows affected, or the reaction failure
    pub fn into_result(self) -> Result<u64, ReactionError> {
        match self.reaction_failure {
            None => Ok(self.rows_affected),
            Some(failure) => Err(failure),
        }
    }
}

/// One logical group of entity changes committed atomically
///
/// Entities are borrowed mutably for the lifetime of the unit of work so no
/// one else can touch them while it is open. Dispatch order is registration
/// order, then recording order within each entity.
pub struct UnitOfWork<'a> {
    store: Arc<dyn ChangeStore>,
    dispatcher: Arc<EventDispatcher>,
    entities: Vec<&'a mut dyn Entity>,
    state: UnitOfWorkState,
}

impl<'a> UnitOfWork<'a> {
    pub fn new(store: Arc<dyn ChangeStore>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            store,
            dispatcher,
            entities: Vec::new(),
            state: UnitOfWorkState::Open,
        }
    }

    /// Tracks `entity` as added or modified
    ///
    /// # Errors
    ///
    /// * `UnitOfWorkError::AlreadyCompleted` - a commit already finished
    /// * `UnitOfWorkError::Abandoned` - an earlier commit future was dropped
    pub fn register_changed(&mut self, entity: &'a mut dyn Entity) -> Result<(), UnitOfWorkError> {
        self.ensure_open()?;
        debug!(
            entity_type = entity.entity_type(),
            entity_id = %entity.id(),
            pending_events = entity.pending_events().len(),
            "Entity registered as changed"
        );
        self.entities.push(entity);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), UnitOfWorkError> {
        match self.state {
            UnitOfWorkState::Open => Ok(()),
            state if state.is_in_flight() => Err(UnitOfWorkError::Abandoned { state }),
            state => Err(UnitOfWorkError::AlreadyCompleted { state }),
        }
    }

    pub fn state(&self) -> UnitOfWorkState {
        self.state
    }

    /// Number of entities registered as changed
    pub fn tracked_count(&self) -> usize {
        self.entities.len()
    }

    /// Commits without a cancellation signal
    pub async fn commit(&mut self) -> Result<CommitReceipt, UnitOfWorkError> {
        self.commit_with_cancellation(&CancellationToken::new()).await
    }

    /// Commits the tracked entities, then dispatches their events
    ///
    /// `cancel` is honoured up to the end of the storage commit. Once the
    /// store reports success, every drained event is dispatched even if
    /// `cancel` fires or this future is dropped.
    ///
    /// # Errors
    ///
    /// * `UnitOfWorkError::CommitFailure` - the store failed; events stay pending
    /// * `UnitOfWorkError::Cancelled` - cancelled before the store committed
    /// * `UnitOfWorkError::AlreadyCompleted` - commit already finished
    /// * `UnitOfWorkError::Abandoned` - an earlier commit future was dropped
    pub async fn commit_with_cancellation(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<CommitReceipt, UnitOfWorkError> {
        self.ensure_open()?;
        if cancel.is_cancelled() {
            self.state = UnitOfWorkState::Failed;
            info!(entities = self.entities.len(), "Unit of work cancelled before commit");
            return Err(UnitOfWorkError::Cancelled);
        }
        self.state = UnitOfWorkState::Committing;

        let committed = {
            let changes: Vec<&dyn Entity> = self.entities.iter().map(|e| &**e).collect();
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.store.commit(&changes) => Some(result),
            }
        };

        let rows_affected = match committed {
            None => {
                self.state = UnitOfWorkState::Failed;
                info!(entities = self.entities.len(), "Unit of work cancelled during commit");
                return Err(UnitOfWorkError::Cancelled);
            }
            Some(Err(source)) => {
                self.state = UnitOfWorkState::Failed;
                error!(entities = self.entities.len(), error = %source, "Unit of work commit failed");
                return Err(UnitOfWorkError::CommitFailure { source });
            }
            Some(Ok(rows)) => rows,
        };
        self.state = UnitOfWorkState::Dispatching;

        // drain everything before dispatching so no event can be delivered twice
        let events: Vec<Box<dyn DomainEvent>> = self
            .entities
            .iter_mut()
            .flat_map(|entity| entity.drain_events())
            .collect();

        let (events_dispatched, reaction_failure) =
            dispatch_detached(Arc::clone(&self.dispatcher), events).await;

        let receipt = CommitReceipt {
            rows_affected,
            events_dispatched,
            reaction_failure,
        };
        self.state = receipt.outcome();

        match &receipt.reaction_failure {
            None => info!(
                rows_affected,
                events_dispatched,
                "Unit of work committed"
            ),
            Some(failure) => warn!(
                rows_affected,
                events_dispatched,
                undispatched_events = failure.undispatched_events,
                error = %failure,
                "Unit of work committed but a reaction failed"
            ),
        }
        Ok(receipt)
    }
}

/// Dispatches `events` in order on a separate task and waits for it
///
/// The task outlives the caller's future, so dropping the commit after the
/// store succeeded does not cut dispatch short.
async fn dispatch_detached(
    dispatcher: Arc<EventDispatcher>,
    events: Vec<Box<dyn DomainEvent>>,
) -> (usize, Option<ReactionError>) {
    if events.is_empty() {
        return (0, None);
    }

    let metadata: Vec<(&'static str, Identifier)> = events
        .iter()
        .map(|event| (event.event_type(), event.entity_id()))
        .collect();
    let total = events.len();
    let progress = Arc::new(AtomicUsize::new(0));

    let task_progress = Arc::clone(&progress);
    let task = tokio::spawn(async move {
        for (index, event) in events.into_iter().enumerate() {
            task_progress.store(index, Ordering::SeqCst);
            if let Err(mut failure) = dispatcher.publish_boxed(event).await {
                failure.undispatched_events = total - index - 1;
                return (index, Some(failure));
            }
        }
        (total, None)
    });

    match task.await {
        Ok(outcome) => outcome,
        Err(join_error) => {
            let index = progress.load(Ordering::SeqCst);
            let (event_type, entity_id) = metadata[index];
            (
                index,
                Some(ReactionError {
                    event_type,
                    entity_id,
                    handler: "unknown".to_string(),
                    source: DomainError::Internal {
                        message: format!("event handler task aborted: {}", join_error),
                    },
                    undispatched_events: total - index - 1,
                }),
            )
        }
    }
}

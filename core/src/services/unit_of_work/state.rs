//! Lifecycle of a unit of work

use std::fmt;

/// `Open -> Committing -> Dispatching -> {CommittedClean | CommittedWithReactionFailure}`,
/// or `Committing -> Failed`
///
/// `Committing` and `Dispatching` only outlive a commit call when its future
/// was dropped. A unit of work left in `Dispatching` has its data stored and
/// its events handed to a detached task that still runs every handler; the
/// state is not updated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitOfWorkState {
    /// Accepting changed entities
    Open,
    /// Storage commit in progress
    Committing,
    /// Data stored, events being dispatched
    Dispatching,
    /// Data committed and every reaction ran
    CommittedClean,
    /// Data committed but a handler failed
    CommittedWithReactionFailure,
    /// Nothing was committed (storage failure or cancellation)
    Failed,
}

impl UnitOfWorkState {
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            UnitOfWorkState::Open | UnitOfWorkState::Committing | UnitOfWorkState::Dispatching
        )
    }

    /// A commit was started but did not report an outcome
    pub fn is_in_flight(&self) -> bool {
        matches!(self, UnitOfWorkState::Committing | UnitOfWorkState::Dispatching)
    }

    /// Whether the data reached storage
    pub fn is_committed(&self) -> bool {
        matches!(
            self,
            UnitOfWorkState::Dispatching
                | UnitOfWorkState::CommittedClean
                | UnitOfWorkState::CommittedWithReactionFailure
        )
    }
}

impl fmt::Display for UnitOfWorkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitOfWorkState::Open => write!(f, "open"),
            UnitOfWorkState::Committing => write!(f, "committing"),
            UnitOfWorkState::Dispatching => write!(f, "dispatching"),
            UnitOfWorkState::CommittedClean => write!(f, "committed"),
            UnitOfWorkState::CommittedWithReactionFailure => {
                write!(f, "committed with reaction failure")
            }
            UnitOfWorkState::Failed => write!(f, "failed"),
        }
    }
}

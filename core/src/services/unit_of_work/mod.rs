//! Unit of work with post-commit event dispatch
//!
//! Tracks changed entities, commits them through a
//! [`ChangeStore`](crate::repositories::ChangeStore), then drains and
//! dispatches their pending events exactly once.

mod state;
mod commit;


pub use state::UnitOfWorkState;
pub use commit::{CommitReceipt, UnitOfWork};

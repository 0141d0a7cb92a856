//! Business services: event dispatch, unit of work and tokens.

pub mod events;
pub mod token;
pub mod unit_of_work;

pub use events::{
    EventDispatcher, EventDispatcherBuilder, EventHandler, EventNotification,
};
pub use token::{
    Clock, ManualClock, SigningKeys, SystemClock, TokenRevocationService, TokenService,
    TokenServiceConfig,
};
pub use unit_of_work::{CommitReceipt, UnitOfWork, UnitOfWorkState};

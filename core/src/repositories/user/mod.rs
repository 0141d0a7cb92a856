//! User storage module.

mod memory;
pub use memory::InMemoryUserStore;

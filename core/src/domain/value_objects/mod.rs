//! Value objects: immutable, invariant-checked domain types.

pub mod identifier;

pub use identifier::Identifier;

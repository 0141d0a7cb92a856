//! Shared configuration and cross-cutting utilities for the Eventide server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (auth, events, environment, logging)
//! - Tracing subscriber initialisation

pub mod config;
pub mod logging;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, Environment, EventsConfig, JwtConfig, LogFormat, LoggingConfig,
};
pub use logging::init_tracing;

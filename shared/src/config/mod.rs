//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing keys, lifetimes and claims
//! - `environment` - Environment detection and logging configuration
//! - `events` - Post-commit domain event dispatch

pub mod auth;
pub mod environment;
pub mod events;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use events::EventsConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Event dispatch configuration
    #[serde(default)]
    pub events: EventsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            auth: AuthConfig::default(),
            events: EventsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            auth: AuthConfig::from_env(),
            events: EventsConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Read the environment specific `.env` file (falling back to `.env`), then load
    pub fn load() -> Self {
        let environment = Environment::from_env();
        if dotenvy::from_filename(environment.env_file()).is_err() {
            dotenvy::dotenv().ok();
        }
        Self::from_env()
    }

    /// Check whether the configured secret is still the development placeholder
    /// while running outside development
    pub fn has_insecure_secret(&self) -> bool {
        !self.environment.is_development()
            && self.auth.jwt.algorithm == "HS256"
            && self.auth.jwt.is_using_default_secret()
    }
}

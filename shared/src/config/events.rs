//! Domain event dispatch configuration

use serde::{Deserialize, Serialize};

/// Settings applied to the post-commit event dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventsConfig {
    /// Handlers running longer than this are reported with a warning (0 disables)
    #[serde(default = "default_slow_handler_threshold_ms")]
    pub slow_handler_threshold_ms: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            slow_handler_threshold_ms: default_slow_handler_threshold_ms(),
        }
    }
}

impl EventsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            slow_handler_threshold_ms: std::env::var("EVENTS_SLOW_HANDLER_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_slow_handler_threshold_ms),
        }
    }

    /// Threshold as a duration, `None` when disabled
    pub fn slow_handler_threshold(&self) -> Option<std::time::Duration> {
        (self.slow_handler_threshold_ms > 0)
            .then(|| std::time::Duration::from_millis(self.slow_handler_threshold_ms))
    }
}

fn default_slow_handler_threshold_ms() -> u64 {
    250
}

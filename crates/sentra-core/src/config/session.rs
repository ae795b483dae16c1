//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout in minutes before a session is considered inactive.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_minutes: u64,
    /// Absolute session timeout in hours (regardless of activity).
    #[serde(default = "default_absolute_timeout")]
    pub absolute_timeout_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: default_idle_timeout(),
            absolute_timeout_hours: default_absolute_timeout(),
        }
    }
}

fn default_idle_timeout() -> u64 {
    30
}

fn default_absolute_timeout() -> u64 {
    12
}

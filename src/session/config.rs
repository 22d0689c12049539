use crate::history::DEFAULT_LOG_CAPACITY;
use std::time::Duration;

/// Fixed delay before an automatic reconnect.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Configuration for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delay between a close and the reconnect attempt (default: 3s).
    /// Every attempt waits the same delay: no backoff, no retry limit.
    pub reconnect_delay: Duration,
    /// Records kept per message log (default: 50)
    pub log_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl SessionConfig {
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }
}

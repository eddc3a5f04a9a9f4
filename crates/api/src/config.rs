//! Settings for the panel server.

use std::time::Duration;

/// Where the panel listens and how often it polls the backend.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Listen address, e.g. `127.0.0.1:8080`.
    pub bind: String,
    /// Interval between background refreshes. Zero disables polling.
    pub poll_interval: Duration,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl ServeConfig {
    /// The poll interval, or `None` when polling is disabled.
    pub fn poll_every(&self) -> Option<Duration> {
        (!self.poll_interval.is_zero()).then_some(self.poll_interval)
    }
}

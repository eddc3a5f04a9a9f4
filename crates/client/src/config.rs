//! Connection settings for the demo backend.

use std::time::Duration;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, e.g. `http://localhost:9999`. A trailing slash is ignored.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9999".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

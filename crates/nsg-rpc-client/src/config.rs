//! # Client Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP chain client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Node API base URL, without a trailing slash.
    pub server_api: String,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Pause between broadcast attempts, in milliseconds.
    pub broadcast_retry_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_api: "http://127.0.0.1:9040".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
            broadcast_retry_delay_ms: 1000,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `server_api` with default timeouts.
    pub fn new(server_api: impl Into<String>) -> Self {
        Self {
            server_api: server_api.into(),
            ..Self::default()
        }
    }

    /// Create a config for testing (short timeouts, no retry pause).
    pub fn for_testing() -> Self {
        Self {
            request_timeout_secs: 2,
            connect_timeout_secs: 1,
            broadcast_retry_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Connect timeout as a duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Broadcast retry pause as a duration.
    pub fn broadcast_retry_delay(&self) -> Duration {
        Duration::from_millis(self.broadcast_retry_delay_ms)
    }

    /// Absolute URL of `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_api.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::new("http://node:20001/");
        assert_eq!(
            config.url("/api/blocks/getHeight"),
            "http://node:20001/api/blocks/getHeight"
        );
    }

    #[test]
    fn test_default_retry_delay() {
        assert_eq!(ClientConfig::default().broadcast_retry_delay(), Duration::from_secs(1));
        assert_eq!(ClientConfig::for_testing().broadcast_retry_delay(), Duration::ZERO);
    }
}

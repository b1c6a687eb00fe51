//! Access-layer configuration.

use std::time::Duration;

/// Fixed address of the todo server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3500";

/// How long a fulfilled query is served from memory before it is refetched.
///
/// This is a freshness TTL counted from the moment the response landed, not
/// from when the last reader stopped using the data.
pub const DEFAULT_KEEP_UNUSED_FOR: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub keep_unused_for: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            keep_unused_for: DEFAULT_KEEP_UNUSED_FOR,
        }
    }

    pub fn with_keep_unused_for(mut self, keep_unused_for: Duration) -> Self {
        self.keep_unused_for = keep_unused_for;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

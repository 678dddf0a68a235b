//! Client configuration.

use crate::error::{Error, Result};

/// Minimum number of bytes the broker should accumulate before answering a
/// fetch request.
pub const FETCH_MIN_BYTES: usize = 100;

/// Maximum number of bytes returned by a single fetch request.
pub const FETCH_MAX_BYTES: usize = 10_000_000;

/// Configuration for a [`Client`](crate::Client).
///
/// The consumer binds to `(topic, group_id)` against the full broker list;
/// the producer binds to the first broker address.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Kafka broker addresses (`host:port`).
    pub brokers: Vec<String>,
    /// Topic to produce to and consume from.
    pub topic: String,
    /// Consumer group id.
    pub group_id: String,
    /// Consumer session timeout in milliseconds.
    pub session_timeout_ms: String,
    /// Where to start when the group has no committed offset.
    pub auto_offset_reset: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            brokers: Vec::new(),
            topic: String::new(),
            group_id: String::new(),
            session_timeout_ms: "6000".to_string(),
            auto_offset_reset: "earliest".to_string(),
        }
    }
}

impl ClientConfig {
    /// Check that all required parameters are present and non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.brokers.is_empty() {
            return Err(Error::Config("broker list is empty".to_string()));
        }
        if self.brokers[0].is_empty() {
            return Err(Error::Config(
                "first broker address is an empty string".to_string(),
            ));
        }
        if self.topic.is_empty() {
            return Err(Error::Config("topic is empty".to_string()));
        }
        if self.group_id.is_empty() {
            return Err(Error::Config("consumer group id is empty".to_string()));
        }
        Ok(())
    }
}

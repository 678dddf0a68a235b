//! Shared helpers for broker-backed tests.
//!
//! E2E tests run against a real broker. The address defaults to a local
//! listener and can be overridden with `KAFKA_BROKERS`; topic and group
//! names are suffixed with a random id so concurrent test runs do not
//! observe each other's records.

use crate::client::ClientConfig;

/// Default broker address for tests.
pub const DEFAULT_BROKER: &str = "localhost:9092";

/// Broker address for tests, honoring the `KAFKA_BROKERS` override.
pub fn broker_addr() -> String {
    std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| DEFAULT_BROKER.to_string())
}

/// Short random id to isolate one test run from another.
pub fn generate_test_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub fn unique_topic(prefix: &str) -> String {
    format!("{prefix}-{}", generate_test_id())
}

pub fn unique_group(prefix: &str) -> String {
    format!("{prefix}-group-{}", generate_test_id())
}

/// Client configuration against the test broker for a given topic/group.
pub fn test_client_config(topic: &str, group_id: &str) -> ClientConfig {
    ClientConfig {
        brokers: vec![broker_addr()],
        topic: topic.to_string(),
        group_id: group_id.to_string(),
        ..Default::default()
    }
}

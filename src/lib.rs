//! kafka-roundtrip library
//!
//! Orchestration for a produce/consume roundtrip against Kafka: a producer
//! loop emitting keyed records and a consumer loop running manual
//! fetch-process-commit cycles, driven concurrently until both finish.
//!
//! # CLI Usage
//!
//! ```bash
//! # Produce and consume 100 records each against a local broker
//! kafka-roundtrip --brokers localhost:19092 \
//!   --topic roundtrip-events --group-id roundtrip-consumer-group
//!
//! # Create the topic first and bound the run to 30 seconds
//! kafka-roundtrip --brokers localhost:19092 --create-topic --timeout 30s
//! ```

use clap::Parser;

pub mod config;
pub mod runner;
pub mod testing;

// Re-export the client crate for convenience
pub use kafka_roundtrip_client as client;

use kafka_roundtrip_client::ClientConfig;

/// Broker connection options shared by the CLI and tests.
#[derive(Parser, Clone, Debug)]
pub struct BrokerOpts {
    /// Kafka brokers (comma-separated or multiple --brokers)
    #[arg(long, value_delimiter = ',', required = true, env = "KAFKA_BROKERS")]
    pub brokers: Vec<String>,

    /// Topic to produce to and consume from
    #[arg(long, default_value = "roundtrip-events")]
    pub topic: String,

    /// Consumer group id
    #[arg(long, default_value = "roundtrip-consumer-group")]
    pub group_id: String,

    /// Consumer session timeout in milliseconds
    #[arg(long, default_value = "6000")]
    pub session_timeout_ms: String,

    /// Where to start when the group has no committed offset (earliest/latest)
    #[arg(long, default_value = "earliest")]
    pub auto_offset_reset: String,
}

impl BrokerOpts {
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            brokers: self.brokers.clone(),
            topic: self.topic.clone(),
            group_id: self.group_id.clone(),
            session_timeout_ms: self.session_timeout_ms.clone(),
            auto_offset_reset: self.auto_offset_reset.clone(),
        }
    }
}

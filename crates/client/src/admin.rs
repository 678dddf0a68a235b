//! Topic administration helpers.

use std::time::Duration;

use anyhow::Context;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::RDKafkaErrorCode;

/// Create `topic` with the given partition count if it does not exist yet.
/// An already-existing topic is not an error.
pub async fn create_topic_if_not_exists(
    brokers: &str,
    topic: &str,
    partitions: i32,
) -> anyhow::Result<()> {
    let admin: AdminClient<DefaultClientContext> = rdkafka::ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .create()
        .context("failed to create admin client")?;

    let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(1));
    let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(5)));

    let results = admin
        .create_topics(&[new_topic], &opts)
        .await
        .context("topic creation request failed")?;

    for result in results {
        match result {
            Ok(name) => tracing::info!("topic '{name}' created"),
            Err((name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                tracing::info!("topic '{name}' already exists");
            }
            Err((name, err)) => anyhow::bail!("failed to create topic '{name}': {err}"),
        }
    }

    Ok(())
}
